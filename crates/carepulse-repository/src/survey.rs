//! Survey structure repositories.
//!
//! Surveys, their fields, and field choices need nothing beyond the generic
//! owner-scoped operations, so the repositories are plain instantiations of
//! [`ChildRepository`].

use carepulse_types::{FieldChoice, Survey, SurveyField};

use crate::child::ChildRepository;
use crate::composer::BasicKeys;

/// Surveys of a project.
pub type SurveyRepository<S> = ChildRepository<Survey, S, BasicKeys<Survey>>;

/// Fields of a survey.
pub type SurveyFieldRepository<S> = ChildRepository<SurveyField, S, BasicKeys<SurveyField>>;

/// Choices of a survey field.
pub type FieldChoiceRepository<S> = ChildRepository<FieldChoice, S, BasicKeys<FieldChoice>>;
