//! Shared proptest configuration for the Carepulse test suites.
//!
//! Keeps case counts consistent across suites and overridable for CI via the
//! `PROPTEST_CASES` environment variable.
//!
//! For async property tests, prefer `TestRunner` with one tokio runtime per
//! test function, reused across iterations — creating a runtime inside the
//! proptest closure multiplies startup cost by the case count.

use proptest::test_runner::Config as ProptestConfig;

/// Default number of proptest cases.
pub const DEFAULT_PROPTEST_CASES: u32 = 50;

/// Number of test cases to run, from `PROPTEST_CASES` or the default.
#[must_use]
pub fn test_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PROPTEST_CASES)
}

/// Proptest configuration with the shared case count.
#[must_use]
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig::with_cases(test_cases())
}
