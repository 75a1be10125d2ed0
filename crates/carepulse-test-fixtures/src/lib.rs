//! # Carepulse Test Fixtures
//!
//! Shared helpers for the persistence-layer test suites: proptest
//! configuration, entity builders, and a failure-injecting store wrapper for
//! partial-batch scenarios.

#![deny(unsafe_code)]
#![allow(clippy::unwrap_used)]

pub mod builders;
pub mod failing;
pub mod proptest_config;

pub use failing::FlakyBatchStore;
