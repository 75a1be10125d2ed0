//! Key encoding for the persistence layer.
//!
//! Every key is a `#`-joined string of literal prefix tokens and id or
//! timestamp segments. The same builders are used at write time (by the key
//! composers) and at read time (by the query methods), so the two can never
//! drift apart.
//!
//! # Key Schema
//!
//! - `<OWNER_KIND>#<owner_id>` / `<KIND>#<id>` — primary key of an owned
//!   entity (e.g. `PROJECT#p1` / `PATIENT#a7`)
//! - `META` / `<KIND>#<id>` — primary key of a top-level entity
//! - `PATIENT#<id>` / `<rfc3339>` — patient-scoped time index (answer
//!   batches, field answers)
//! - `STRATEGY#<id>` / `<rfc3339>` — strategy-scoped time index
//!   (registrations, scheduled jobs)
//! - `PROJECT#<p>#STRATEGY#<s>#<CATEGORY>` / `<KIND>#<id>` — outcome-scope
//!   composite index (registrations, answer batches)
//! - `VALIDATED#<survey_id>` or `CUSTOM#<survey_id>` / `<rfc3339>` —
//!   questionnaire discriminator index (answer batches)
//! - `LOCK#<lock_id>` / `LOCK` — lease lock rows

use carepulse_store::ItemKey;
use carepulse_types::{kind, OutcomeCategory};
use chrono::{DateTime, SecondsFormat, Utc};

/// Segment separator inside composite keys.
pub const SEP: char = '#';

/// Build a `<KIND>#<id>` segment.
#[inline]
pub fn scoped(kind: &str, id: &str) -> String {
    format!("{}{}{}", kind, SEP, id)
}

/// Build the `<KIND>#` prefix used for sort-key `begins_with` listings.
#[inline]
pub fn sort_prefix(kind: &str) -> String {
    format!("{}{}", kind, SEP)
}

/// Build the partition key for an owner scope.
///
/// Top-level entities use the bare `META` sentinel as their partition; real
/// owners use `<OWNER_KIND>#<owner_id>`.
#[inline]
pub fn owner_partition(owner_kind: &str, owner_id: &str) -> String {
    if owner_kind == kind::META {
        kind::META.to_string()
    } else {
        scoped(owner_kind, owner_id)
    }
}

/// Encode a timestamp for use inside a key.
///
/// Fixed-width RFC 3339 UTC with millisecond precision, so lexicographic
/// comparison of encoded values equals chronological comparison. This
/// encoding is part of the stored data format.
#[inline]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build the outcome-scope composite partition key:
/// `PROJECT#<project>#STRATEGY#<strategy>#<CATEGORY>`.
///
/// Used as the secondary partition for analytics slicing of registrations
/// and answer batches.
#[inline]
pub fn outcome_scope(project_id: &str, strategy_id: &str, category: OutcomeCategory) -> String {
    format!(
        "{}{}{}{}{}",
        scoped(kind::PROJECT, project_id),
        SEP,
        scoped(kind::STRATEGY, strategy_id),
        SEP,
        category.as_token()
    )
}

/// Build the questionnaire discriminator partition for an answer batch:
/// `VALIDATED#<survey_id>` when the survey belongs to the validated
/// catalogue, `CUSTOM#<survey_id>` otherwise.
#[inline]
pub fn questionnaire_partition(survey_id: &str, validated: bool) -> String {
    let token = if validated { kind::VALIDATED } else { kind::CUSTOM };
    scoped(token, survey_id)
}

/// Key builders for lease lock rows.
pub mod lock {
    use super::*;

    /// Primary key of a lock row. One row per lock id.
    #[inline]
    pub fn primary(lock_id: &str) -> ItemKey {
        ItemKey::new(scoped(kind::LOCK, lock_id), kind::LOCK)
    }
}
