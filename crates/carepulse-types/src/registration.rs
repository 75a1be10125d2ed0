//! Registration entity: one recorded outcome event under a strategy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{kind, Entity};
use crate::strategy::OutcomeCategory;

/// A single registered outcome event (e.g. an effect occurring) for a
/// patient's strategy.
///
/// Registrations are indexed three ways: by owning strategy (primary), by
/// strategy and time (for range queries), and by the outcome scope composite
/// key (for analytics slicing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub id: String,
    pub project_id: String,
    pub patient_id: String,
    pub effect_id: String,
    pub category: OutcomeCategory,
    pub registered_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Registration {
    const KIND: &'static str = kind::REGISTRATION;
    const OWNER_KIND: &'static str = kind::STRATEGY;

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
