//! # Carepulse Types
//!
//! Shared entity definitions for the Carepulse persistence layer.
//!
//! This crate provides the [`Entity`] contract the generic repositories are
//! written against, plus every domain entity type, ensuring a single source
//! of truth and preventing circular dependencies between the store and
//! repository crates.

#![deny(unsafe_code)]

// ============================================================================
// Entity Contract
// ============================================================================

pub mod entity;

pub use entity::{kind, Entity, META_OWNER};

// ============================================================================
// Project-Scoped Entities
// ============================================================================

pub mod patient;
pub mod report;
pub mod survey;

pub use patient::Patient;
pub use report::{Report, SendoutFrequency};
pub use survey::{FieldChoice, FieldKind, Survey, SurveyField};

// ============================================================================
// Patient-Scoped Entities
// ============================================================================

pub mod strategy;
pub mod tag;

pub use strategy::{Effect, OutcomeCategory, Strategy};
pub use tag::Tag;

// ============================================================================
// Answer and Outcome Entities
// ============================================================================

pub mod answers;
pub mod registration;

pub use answers::{AnswerBatch, FieldAnswer};
pub use registration::Registration;

// ============================================================================
// Top-Level Entities
// ============================================================================

pub mod account;
pub mod job;

pub use account::{Account, Project, Role};
pub use job::{JobStatus, ScheduledJob};

// ============================================================================
// Supporting Types
// ============================================================================

pub mod validated;

pub use validated::ValidatedSurveys;
