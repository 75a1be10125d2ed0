//! Scheduled survey-sendout job entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{kind, Entity};

/// Delivery state of a scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobStatus {
    Pending,
    Sent,
    Cancelled,
}

/// A scheduled survey sendout for one patient.
///
/// Jobs are top-level entities (owner is the [`META_OWNER`](crate::entity::META_OWNER)
/// sentinel) and are
/// additionally listed through strategy-scoped and patient-scoped indexes.
/// Job generation across instances is serialized by the lease lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    #[serde(default)]
    pub id: String,
    pub strategy_id: String,
    pub patient_id: String,
    pub survey_id: String,
    pub due_at: DateTime<Utc>,
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for ScheduledJob {
    const KIND: &'static str = kind::JOB;
    const OWNER_KIND: &'static str = kind::META;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}
