//! Patient entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{kind, Entity};

/// A patient enrolled in a project.
///
/// Patients own strategies and tags and are the alternate owner for answer
/// batches and field answers. The denormalized `tags` list exists for
/// client-side tag filtering; the authoritative tag records are separate
/// [`Tag`](crate::Tag) entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Entity for Patient {
    const KIND: &'static str = kind::PATIENT;
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
