//! Scheduled-job repository.

use carepulse_store::{KeyValueStore, Query, QueryIndex, SecondaryIndex, SortCondition, WriteRequest};
use carepulse_types::{kind, ScheduledJob};
use chrono::{DateTime, Utc};

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::ScheduledJobKeys;
use crate::error::RepositoryResult;
use crate::keys;
use crate::top_level::TopLevelRepository;

type Inner<S> = TopLevelRepository<ScheduledJob, S, ScheduledJobKeys>;

/// Repository for scheduled survey-sendout jobs.
///
/// Jobs live under the `META` partition; scoped listings use the
/// strategy-scoped and patient-scoped indexes. Generation runs hold the
/// lease lock while writing, so only one instance creates jobs for a given
/// sendout configuration at a time — the repository itself does not touch
/// the lock.
pub struct ScheduledJobRepository<S: KeyValueStore> {
    inner: Inner<S>,
}

impl<S: KeyValueStore> ScheduledJobRepository<S> {
    pub fn new(store: S) -> Self {
        Self { inner: TopLevelRepository::from_store(store) }
    }

    pub async fn create(&self, job: ScheduledJob) -> RepositoryResult<ScheduledJob> {
        self.inner.create(job).await
    }

    pub async fn read(&self, id: &str) -> RepositoryResult<Option<ScheduledJob>> {
        self.inner.read(id).await
    }

    pub async fn update(&self, job: ScheduledJob) -> RepositoryResult<ScheduledJob> {
        self.inner.update(job).await
    }

    pub async fn update_value<F>(&self, id: &str, mutate: F) -> RepositoryResult<ScheduledJob>
    where
        F: FnOnce(&mut ScheduledJob),
    {
        self.inner.update_value(id, mutate).await
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.inner.delete(id).await
    }

    pub async fn read_all(&self) -> RepositoryResult<Vec<ScheduledJob>> {
        self.inner.read_all().await
    }

    pub async fn delete_batch(&self, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(ids).await
    }

    pub async fn update_batch(&self, jobs: Vec<ScheduledJob>) -> RepositoryResult<Vec<ScheduledJob>> {
        self.inner.update_batch(jobs).await
    }

    /// Jobs for one strategy, ordered by due time.
    pub async fn list_for_strategy(&self, strategy_id: &str) -> RepositoryResult<Vec<ScheduledJob>> {
        self.query_index(
            keys::scoped(kind::STRATEGY, strategy_id),
            SecondaryIndex::Gsi1,
            None,
        )
        .await
    }

    /// Jobs for one patient, ordered by due time.
    pub async fn list_for_patient(&self, patient_id: &str) -> RepositoryResult<Vec<ScheduledJob>> {
        self.query_index(keys::scoped(kind::PATIENT, patient_id), SecondaryIndex::Gsi2, None)
            .await
    }

    /// Jobs for one strategy due at or before `at`, ordered by due time.
    pub async fn list_due_for_strategy(
        &self,
        strategy_id: &str,
        at: DateTime<Utc>,
    ) -> RepositoryResult<Vec<ScheduledJob>> {
        self.query_index(
            keys::scoped(kind::STRATEGY, strategy_id),
            SecondaryIndex::Gsi1,
            Some(SortCondition::AtMost(keys::timestamp(at))),
        )
        .await
    }

    /// Delete unit covering every job scheduled for the patient, for the
    /// patient-deletion cascade.
    pub async fn delete_unit_for_patient(&self, patient_id: &str) -> RepositoryResult<WriteUnit> {
        let query = Query::builder()
            .partition(keys::scoped(kind::PATIENT, patient_id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi2))
            .build();
        let items = self.inner.inner().store().query(query).await?;
        Ok(WriteUnit::new(items.into_iter().map(|item| WriteRequest::Delete(item.key)).collect()))
    }

    async fn query_index(
        &self,
        partition: String,
        index: SecondaryIndex,
        sort: Option<SortCondition>,
    ) -> RepositoryResult<Vec<ScheduledJob>> {
        let query = Query::builder()
            .partition(partition)
            .index(QueryIndex::Secondary(index))
            .maybe_sort(sort)
            .build();
        let items = self.inner.inner().store().query(query).await?;
        ChildRepository::<ScheduledJob, S, ScheduledJobKeys>::decode_all(&items)
    }
}
