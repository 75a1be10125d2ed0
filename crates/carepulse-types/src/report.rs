//! Report and sendout-frequency entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{kind, Entity};

/// A generated analytics report for a project. Listings return newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Report {
    const KIND: &'static str = kind::REPORT;
    const OWNER_KIND: &'static str = kind::PROJECT;
    const LIST_DESCENDING: bool = true;

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

/// A sendout cadence with its member patients.
///
/// Membership is a plain id list; patient deletion removes the patient from
/// every frequency as part of the cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendoutFrequency {
    #[serde(default)]
    pub id: String,
    pub cadence_days: u32,
    #[serde(default)]
    pub patient_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for SendoutFrequency {
    const KIND: &'static str = kind::SENDOUT;
    const OWNER_KIND: &'static str = kind::PROJECT;

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
