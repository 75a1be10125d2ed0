//! Survey answer entities: the batch (one submission) and the per-field
//! entries inside it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{kind, Entity};
use crate::strategy::OutcomeCategory;

/// One submitted set of answers to a survey.
///
/// The declared owner is the survey; the answering patient is the alternate
/// owner, reachable through the patient-scoped time index. A third index
/// carries the questionnaire discriminator: batches for surveys in the
/// validated catalogue live under a `VALIDATED#...` partition, free-form
/// surveys under `CUSTOM#...`. The discriminator is part of the key string,
/// so moving a survey into the catalogue requires rewriting its batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerBatch {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    pub patient_id: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub category: Option<OutcomeCategory>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for AnswerBatch {
    const KIND: &'static str = kind::ANSWERS;
    const OWNER_KIND: &'static str = kind::SURVEY;

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

/// One field-level answer inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAnswer {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    pub patient_id: String,
    pub field_id: String,
    pub value: String,
    pub answered_at: DateTime<Utc>,
    #[serde(default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub category: Option<OutcomeCategory>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for FieldAnswer {
    const KIND: &'static str = kind::ENTRY;
    const OWNER_KIND: &'static str = kind::ANSWERS;

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
