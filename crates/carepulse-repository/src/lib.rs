//! # Carepulse Repository - Entity Persistence Layer
//!
//! Maps every Carepulse domain entity type onto a single schemaless
//! key-value store using composite partition/sort keys and a small fixed set
//! of secondary indexes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   Service Layer                      │
//! ├──────────────────────────────────────────────────────┤
//! │        Specialized Access-Pattern Repositories       │
//! │  AnswerBatchRepository │ RegistrationRepository │ …  │
//! │     (range-by-time, alternate-owner, composite)      │
//! ├──────────────────────────────────────────────────────┤
//! │    ChildRepository<E, S, C> / TopLevelRepository     │
//! │     (ids, timestamps, serialization, key reuse)      │
//! │             KeyComposer<E> per entity                │
//! ├───────────────┬──────────────────┬───────────────────┤
//! │  LeaseLock    │ BatchCoordinator │    keys module    │
//! ├───────────────┴──────────────────┴───────────────────┤
//! │             carepulse-store KeyValueStore            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Encoding
//!
//! All key material is built by the [`keys`] module from literal prefix
//! tokens, entity ids, and encoded timestamps, and every non-id key field is
//! recomputed from current entity state on every write. See the module docs
//! of [`keys`] for the full schema.
//!
//! # Error Handling
//!
//! Operations return [`RepositoryResult<T>`]. Absence on reads is `Ok(None)`;
//! store failures propagate unretried; multi-unit batches report partial
//! progress via [`RepositoryError::PartialBatch`].

#![deny(unsafe_code)]

pub mod batch;
pub mod child;
pub mod composer;
pub mod error;
pub mod keys;
pub mod lock;
pub mod storage;
pub mod top_level;

pub mod accounts;
pub mod answers;
pub mod jobs;
pub mod patient;
pub mod registration;
pub mod reports;
pub mod strategy;
pub mod survey;
pub mod tags;

// Re-export main types for convenience
pub use batch::{BatchCoordinator, WriteUnit};
pub use child::ChildRepository;
pub use composer::{
    AnswerBatchKeys, BasicKeys, FieldAnswerKeys, KeyComposer, RegistrationKeys, ScheduledJobKeys,
};
pub use error::{RepositoryError, RepositoryResult};
pub use lock::LeaseLock;
pub use storage::DomainStorage;
pub use top_level::TopLevelRepository;

pub use accounts::{AccountRepository, ProjectRepository, RoleRepository};
pub use answers::{AnswerBatchRepository, FieldAnswerRepository};
pub use jobs::ScheduledJobRepository;
pub use patient::PatientRepository;
pub use registration::RegistrationRepository;
pub use reports::{ReportRepository, SendoutFrequencyRepository};
pub use strategy::{EffectRepository, StrategyRepository};
pub use survey::{FieldChoiceRepository, SurveyFieldRepository, SurveyRepository};
pub use tags::TagRepository;
