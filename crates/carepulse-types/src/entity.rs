//! The entity contract shared by every repository.
//!
//! An entity is a serializable document with a string id, an owning parent,
//! and server-managed timestamps. The kind tokens below are the literal
//! prefixes baked into partition and sort keys; they are part of the stored
//! data format and must never change for persisted entity types.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Sentinel owner id for top-level entities. Top-level entities reuse the
/// owned-entity machinery under this fixed parent.
pub const META_OWNER: &str = "META";

/// Key prefix tokens, one per entity kind.
pub mod kind {
    pub const PROJECT: &str = "PROJECT";
    pub const PATIENT: &str = "PATIENT";
    pub const SURVEY: &str = "SURVEY";
    pub const FIELD: &str = "FIELD";
    pub const CHOICE: &str = "CHOICE";
    pub const STRATEGY: &str = "STRATEGY";
    pub const EFFECT: &str = "EFFECT";
    pub const REGISTRATION: &str = "REGISTRATION";
    pub const ANSWERS: &str = "ANSWERS";
    pub const ENTRY: &str = "ENTRY";
    pub const JOB: &str = "JOB";
    pub const REPORT: &str = "REPORT";
    pub const TAG: &str = "TAG";
    pub const SENDOUT: &str = "SENDOUT";
    pub const ACCOUNT: &str = "ACCOUNT";
    pub const ROLE: &str = "ROLE";
    pub const META: &str = "META";
    pub const LOCK: &str = "LOCK";

    /// Discriminator tokens for the questionnaire index: surveys in the
    /// validated catalogue vs free-form ("custom") surveys.
    pub const VALIDATED: &str = "VALIDATED";
    pub const CUSTOM: &str = "CUSTOM";
}

/// Capability set every persisted entity exposes to the generic repository.
///
/// The id is assigned once (on create, when blank) and never recomputed.
/// All key material other than the id is derived from current field values
/// by the entity's key composer on every write.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned {
    /// Sort-key prefix token for this entity kind.
    const KIND: &'static str;

    /// Partition-key prefix token of the owning entity kind.
    const OWNER_KIND: &'static str;

    /// Whether owner-scoped listings return items in descending sort-key
    /// order. Fixed per entity type.
    const LIST_DESCENDING: bool = false;

    /// The entity id. Empty string means "not yet assigned".
    fn id(&self) -> &str;

    /// Assign the id. Called exactly once, on create.
    fn assign_id(&mut self, id: String);

    /// Creation timestamp, if the entity has been persisted.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Stamp timestamps for a write: sets `created_at` on first persist and
    /// `updated_at` on every write.
    fn touch(&mut self, now: DateTime<Utc>);
}
