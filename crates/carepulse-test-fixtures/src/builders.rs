//! Entity builders with sensible test defaults.

use carepulse_types::{
    AnswerBatch, FieldAnswer, JobStatus, OutcomeCategory, Patient, Registration, ScheduledJob,
    SendoutFrequency, Survey, Tag,
};
use chrono::{DateTime, TimeZone, Utc};

/// Standard project id for single-tenant tests.
pub const PROJECT_ID: &str = "project-1";

/// A day within the fixed test month, for readable range-query tests.
#[must_use]
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
}

#[must_use]
pub fn patient(name: &str) -> Patient {
    Patient {
        id: String::new(),
        name: name.to_string(),
        email: Some(format!("{}@clinic.example", name.to_lowercase())),
        phone: None,
        tags: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn survey(title: &str) -> Survey {
    Survey {
        id: String::new(),
        title: title.to_string(),
        intro: None,
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn tag(name: &str) -> Tag {
    Tag { id: String::new(), name: name.to_string(), created_at: None, updated_at: None }
}

#[must_use]
pub fn answer_batch(patient_id: &str, submitted_at: DateTime<Utc>) -> AnswerBatch {
    AnswerBatch {
        id: String::new(),
        project_id: PROJECT_ID.to_string(),
        patient_id: patient_id.to_string(),
        submitted_at,
        strategy_id: None,
        category: None,
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn field_answer(patient_id: &str, field_id: &str, answered_at: DateTime<Utc>) -> FieldAnswer {
    FieldAnswer {
        id: String::new(),
        project_id: PROJECT_ID.to_string(),
        patient_id: patient_id.to_string(),
        field_id: field_id.to_string(),
        value: "3".to_string(),
        answered_at,
        strategy_id: None,
        category: None,
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn registration(
    patient_id: &str,
    effect_id: &str,
    category: OutcomeCategory,
    registered_at: DateTime<Utc>,
) -> Registration {
    Registration {
        id: String::new(),
        project_id: PROJECT_ID.to_string(),
        patient_id: patient_id.to_string(),
        effect_id: effect_id.to_string(),
        category,
        registered_at,
        note: None,
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn scheduled_job(strategy_id: &str, patient_id: &str, due_at: DateTime<Utc>) -> ScheduledJob {
    ScheduledJob {
        id: String::new(),
        strategy_id: strategy_id.to_string(),
        patient_id: patient_id.to_string(),
        survey_id: "phq-9".to_string(),
        due_at,
        status: JobStatus::Pending,
        created_at: None,
        updated_at: None,
    }
}

#[must_use]
pub fn sendout_frequency(cadence_days: u32, patient_ids: &[&str]) -> SendoutFrequency {
    SendoutFrequency {
        id: String::new(),
        cadence_days,
        patient_ids: patient_ids.iter().map(|id| id.to_string()).collect(),
        created_at: None,
        updated_at: None,
    }
}
