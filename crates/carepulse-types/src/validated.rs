//! The validated questionnaire catalogue.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// The set of survey ids belonging to the validated questionnaire catalogue.
///
/// Membership decides the discriminator token in answer-batch index keys:
/// catalogue surveys index under `VALIDATED#...`, everything else under
/// `CUSTOM#...`. The set is loaded at startup and injected into the
/// answer-batch key composer; changing membership means affected batches
/// must be rewritten so their keys move.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedSurveys {
    ids: HashSet<String>,
}

impl ValidatedSurveys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the survey is part of the validated catalogue.
    pub fn contains(&self, survey_id: &str) -> bool {
        self.ids.contains(survey_id)
    }

    /// Add a survey to the catalogue.
    pub fn insert(&mut self, survey_id: impl Into<String>) {
        self.ids.insert(survey_id.into());
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<String> for ValidatedSurveys {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}
