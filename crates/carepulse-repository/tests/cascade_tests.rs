//! End-to-end patient-deletion cascade: multi-entity fan-out through the
//! batch coordinator, partial failure mid-cascade, and idempotent retry.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use carepulse_repository::{
    AnswerBatchRepository, BatchCoordinator, FieldAnswerRepository, PatientRepository,
    RepositoryError, RepositoryResult, ScheduledJobRepository, SendoutFrequencyRepository,
    TagRepository, WriteUnit,
};
use carepulse_store::MemoryStore;
use carepulse_test_fixtures::builders::{
    answer_batch, day, field_answer, patient, scheduled_job, sendout_frequency, tag, PROJECT_ID,
};
use carepulse_test_fixtures::FlakyBatchStore;
use carepulse_types::ValidatedSurveys;

const SURVEY: &str = "phq-9";

type Store = FlakyBatchStore<MemoryStore>;

struct Repos {
    patients: PatientRepository<Store>,
    batches: AnswerBatchRepository<Store>,
    entries: FieldAnswerRepository<Store>,
    tags: TagRepository<Store>,
    jobs: ScheduledJobRepository<Store>,
    sendouts: SendoutFrequencyRepository<Store>,
    coordinator: BatchCoordinator<Store>,
}

impl Repos {
    fn new(store: Store) -> Self {
        Self {
            patients: PatientRepository::new(store.clone()),
            batches: AnswerBatchRepository::new(store.clone(), ValidatedSurveys::new()),
            entries: FieldAnswerRepository::new(store.clone()),
            tags: TagRepository::new(store.clone()),
            jobs: ScheduledJobRepository::new(store.clone()),
            sendouts: SendoutFrequencyRepository::new(store.clone()),
            coordinator: BatchCoordinator::new(store),
        }
    }

    /// The cascade a service runs when a patient is removed: delete the
    /// patient, their answer batches, field entries, tags, and scheduled
    /// jobs, then drop them from sendout-frequency membership. Best-effort,
    /// non-atomic; every unit is safe to rebuild and resubmit.
    async fn patient_cascade_units(&self, patient_id: &str) -> RepositoryResult<Vec<WriteUnit>> {
        Ok(vec![
            self.patients.delete_unit(PROJECT_ID, &[patient_id.to_string()]),
            self.batches.delete_unit_for_patient(patient_id).await?,
            self.entries.delete_unit_for_patient(patient_id).await?,
            self.tags.delete_unit_for_patient(patient_id).await?,
            self.jobs.delete_unit_for_patient(patient_id).await?,
            self.sendouts.membership_removal_unit(PROJECT_ID, patient_id).await?,
        ])
    }
}

#[tokio::test]
async fn test_patient_cascade_with_midway_failure_and_retry() {
    // Allow two successful batch calls (patient + batches), then fail.
    let store = FlakyBatchStore::new(MemoryStore::new(), 2);
    let repos = Repos::new(store.clone());

    let alice = repos.patients.create(PROJECT_ID, patient("Alice")).await.unwrap();
    let pid = alice.id.clone();

    for d in [1, 5, 10] {
        repos.batches.create(SURVEY, answer_batch(&pid, day(d))).await.unwrap();
    }
    repos.entries.create("batch-1", field_answer(&pid, "f1", day(1))).await.unwrap();
    repos.entries.create("batch-1", field_answer(&pid, "f2", day(5))).await.unwrap();
    repos.tags.create(&pid, tag("high-risk")).await.unwrap();
    repos.tags.create(&pid, tag("weekly")).await.unwrap();
    repos.jobs.create(scheduled_job("s1", &pid, day(20))).await.unwrap();
    let freq = repos
        .sendouts
        .create(PROJECT_ID, sendout_frequency(7, &[&pid, "bob"]))
        .await
        .unwrap();

    // Range query sanity before the cascade: [day 2, day 8] hits exactly
    // the day-5 batch.
    let in_range = repos.batches.read_between(&pid, day(2), day(8)).await.unwrap();
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].submitted_at, day(5));

    // First cascade attempt fails on the third unit (field entries).
    let units = repos.patient_cascade_units(&pid).await.unwrap();
    let err = repos.coordinator.submit(units).await.unwrap_err();
    match err {
        RepositoryError::PartialBatch { committed, total, .. } => {
            assert_eq!(committed, 4, "patient delete (1) and batch deletes (3) had committed");
            assert_eq!(total, 10);
        },
        other => panic!("expected PartialBatch, got {other}"),
    }

    // Earlier units are not rolled back...
    assert!(repos.patients.read(PROJECT_ID, &pid).await.unwrap().is_none());
    assert!(repos.batches.read_between(&pid, day(1), day(10)).await.unwrap().is_empty());
    // ...later units never ran.
    assert_eq!(repos.entries.read_between(&pid, day(1), day(10)).await.unwrap().len(), 2);
    assert_eq!(repos.tags.read_all(&pid).await.unwrap().len(), 2);
    assert_eq!(repos.jobs.list_for_patient(&pid).await.unwrap().len(), 1);

    // Retry after the store recovers. Rebuilding the units naturally skips
    // what already succeeded (the batch unit is now empty), and re-deleting
    // already-deleted rows is a no-op rather than an error.
    store.heal();
    let units = repos.patient_cascade_units(&pid).await.unwrap();
    let remaining: usize = units.iter().map(WriteUnit::len).sum();
    let committed = repos.coordinator.submit(units).await.unwrap();
    assert_eq!(committed, remaining);

    assert!(repos.entries.read_between(&pid, day(1), day(10)).await.unwrap().is_empty());
    assert!(repos.tags.read_all(&pid).await.unwrap().is_empty());
    assert!(repos.jobs.list_for_patient(&pid).await.unwrap().is_empty());

    let after = repos.sendouts.read(PROJECT_ID, &freq.id).await.unwrap().unwrap();
    assert_eq!(after.patient_ids, vec!["bob".to_string()]);

    // A third run finds nothing left to remove: every query-derived unit is
    // empty, and the one unconditional key delete is a harmless no-op.
    let units = repos.patient_cascade_units(&pid).await.unwrap();
    let remaining: usize = units.iter().map(WriteUnit::len).sum();
    assert_eq!(remaining, 1, "only the unconditional patient key delete remains");
    assert_eq!(repos.coordinator.submit(units).await.unwrap(), 1);
}
