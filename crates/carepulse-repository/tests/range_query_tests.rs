//! Secondary-index query patterns: time ranges, alternate owners, the
//! questionnaire discriminator, and the outcome composite.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use carepulse_repository::{AnswerBatchRepository, FieldAnswerRepository};
use carepulse_store::MemoryStore;
use carepulse_test_fixtures::builders::{answer_batch, day, field_answer, PROJECT_ID};
use carepulse_types::{OutcomeCategory, ValidatedSurveys};

const SURVEY: &str = "phq-9";
const PATIENT: &str = "alice";

fn repo(store: MemoryStore) -> AnswerBatchRepository<MemoryStore> {
    AnswerBatchRepository::new(store, ValidatedSurveys::new())
}

#[tokio::test]
async fn test_read_between_is_inclusive_and_ordered() {
    let repo = repo(MemoryStore::new());
    for d in [1, 5, 10] {
        repo.create(SURVEY, answer_batch(PATIENT, day(d))).await.unwrap();
    }

    let hits = repo.read_between(PATIENT, day(2), day(8)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].submitted_at, day(5));

    // Bounds are inclusive at both ends.
    let hits = repo.read_between(PATIENT, day(1), day(10)).await.unwrap();
    assert_eq!(hits.len(), 3);
    assert!(hits[0].submitted_at < hits[1].submitted_at);
    assert!(hits[1].submitted_at < hits[2].submitted_at);

    // An empty interval yields empty, not an error.
    assert!(repo.read_between(PATIENT, day(11), day(20)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_alternate_owner_lookup() {
    let repo = repo(MemoryStore::new());
    repo.create(SURVEY, answer_batch(PATIENT, day(3))).await.unwrap();

    // By declared owner (the survey).
    let by_survey = repo.read_for_questionnaire(SURVEY).await.unwrap();
    assert_eq!(by_survey.len(), 1);

    // By alternate owner (the patient who answered).
    let by_patient = repo.read_for_questionnaire(PATIENT).await.unwrap();
    assert_eq!(by_patient.len(), 1);
    assert_eq!(by_patient[0].patient_id, PATIENT);

    // Unknown id walks the whole fallback chain and yields empty.
    assert!(repo.read_for_questionnaire("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_survey_time_range_uses_discriminator_partition() {
    let mut catalogue = ValidatedSurveys::new();
    catalogue.insert(SURVEY);
    let repo = AnswerBatchRepository::new(MemoryStore::new(), catalogue);

    for d in [2, 6, 9] {
        repo.create(SURVEY, answer_batch(PATIENT, day(d))).await.unwrap();
    }

    let hits = repo.read_for_survey_between(SURVEY, day(4), day(7)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].submitted_at, day(6));
}

#[tokio::test]
async fn test_discriminator_move_requires_rewrite() {
    let store = MemoryStore::new();

    // The survey starts outside the validated catalogue.
    let before = repo(store.clone());
    let created = before.create("diary", answer_batch(PATIENT, day(4))).await.unwrap();
    assert_eq!(before.read_for_survey_between("diary", day(1), day(9)).await.unwrap().len(), 1);

    // The catalogue later includes the survey. A repository built with the
    // new catalogue finds nothing until the batch is rewritten, because the
    // discriminator token is baked into the stored key.
    let mut catalogue = ValidatedSurveys::new();
    catalogue.insert("diary");
    let after = AnswerBatchRepository::new(store, catalogue);
    assert!(after.read_for_survey_between("diary", day(1), day(9)).await.unwrap().is_empty());

    // Rewriting recomputes the keys and physically moves the record.
    let stored = after.read("diary", &created.id).await.unwrap().unwrap();
    after.update("diary", stored).await.unwrap();

    assert_eq!(after.read_for_survey_between("diary", day(1), day(9)).await.unwrap().len(), 1);
    assert!(before.read_for_survey_between("diary", day(1), day(9)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_outcome_composite_slicing() {
    let repo = repo(MemoryStore::new());

    let mut improving = answer_batch(PATIENT, day(2));
    improving.strategy_id = Some("s1".to_string());
    improving.category = Some(OutcomeCategory::Improvement);
    repo.create(SURVEY, improving).await.unwrap();

    let mut setback = answer_batch(PATIENT, day(3));
    setback.strategy_id = Some("s1".to_string());
    setback.category = Some(OutcomeCategory::Setback);
    repo.create(SURVEY, setback).await.unwrap();

    // A batch without strategy/category never enters the composite index.
    repo.create(SURVEY, answer_batch(PATIENT, day(4))).await.unwrap();

    let improvements = repo
        .read_for_outcome(PROJECT_ID, "s1", OutcomeCategory::Improvement)
        .await
        .unwrap();
    assert_eq!(improvements.len(), 1);
    assert_eq!(improvements[0].submitted_at, day(2));

    let neutral = repo.read_for_outcome(PROJECT_ID, "s1", OutcomeCategory::Neutral).await.unwrap();
    assert!(neutral.is_empty());
}

#[tokio::test]
async fn test_field_answer_ranges_and_outcome() {
    let repo = FieldAnswerRepository::new(MemoryStore::new());

    for (field, d) in [("f1", 1), ("f2", 5), ("f3", 10)] {
        repo.create("batch-1", field_answer(PATIENT, field, day(d))).await.unwrap();
    }

    let hits = repo.read_between(PATIENT, day(2), day(8)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].field_id, "f2");

    let mut scored = field_answer(PATIENT, "f9", day(6));
    scored.strategy_id = Some("s1".to_string());
    scored.category = Some(OutcomeCategory::Improvement);
    repo.create("batch-1", scored).await.unwrap();

    let sliced = repo
        .read_for_outcome(PROJECT_ID, "s1", OutcomeCategory::Improvement)
        .await
        .unwrap();
    assert_eq!(sliced.len(), 1);
    assert_eq!(sliced[0].field_id, "f9");
}
