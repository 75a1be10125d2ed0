//! Strategy and effect entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{kind, Entity};

/// Outcome category an effect or registration is filed under.
///
/// The token form is baked into composite index keys, so the mapping is
/// frozen for persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    Improvement,
    Setback,
    Neutral,
}

impl OutcomeCategory {
    /// The literal token used inside index keys.
    pub fn as_token(&self) -> &'static str {
        match self {
            OutcomeCategory::Improvement => "IMPROVEMENT",
            OutcomeCategory::Setback => "SETBACK",
            OutcomeCategory::Neutral => "NEUTRAL",
        }
    }
}

/// A treatment strategy tracked for a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Strategy {
    const KIND: &'static str = kind::STRATEGY;
    const OWNER_KIND: &'static str = kind::PATIENT;

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

/// An observable effect tracked under a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: OutcomeCategory,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Effect {
    const KIND: &'static str = kind::EFFECT;
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
