//! Answer repositories: batches and field-level entries.
//!
//! These are the entities with the most query patterns. Which secondary
//! index a read uses depends entirely on which id the caller supplies:
//!
//! - survey id → primary partition (declared owner)
//! - patient id → patient-scoped time index (alternate owner)
//! - outcome scope → composite business-key index
//! - survey id, time-ranged → questionnaire discriminator index

use carepulse_store::{KeyValueStore, Query, QueryIndex, SecondaryIndex, SortCondition, WriteRequest};
use carepulse_types::{kind, AnswerBatch, FieldAnswer, OutcomeCategory, ValidatedSurveys};
use chrono::{DateTime, Utc};

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::{AnswerBatchKeys, FieldAnswerKeys};
use crate::error::RepositoryResult;
use crate::keys;

type BatchInner<S> = ChildRepository<AnswerBatch, S, AnswerBatchKeys>;
type EntryInner<S> = ChildRepository<FieldAnswer, S, FieldAnswerKeys>;

/// Repository for survey answer batches.
///
/// The declared owner is the survey; the answering patient is the alternate
/// owner. Lookups by a bare id try the declared owner first, then the
/// alternate owner, then the custom-survey discriminator partition before
/// concluding empty.
pub struct AnswerBatchRepository<S: KeyValueStore> {
    inner: BatchInner<S>,
}

impl<S: KeyValueStore> AnswerBatchRepository<S> {
    /// Create the repository. The validated-questionnaire catalogue feeds
    /// the discriminator in the composed keys.
    pub fn new(store: S, validated: ValidatedSurveys) -> Self {
        Self { inner: ChildRepository::new(store, AnswerBatchKeys::new(validated)) }
    }

    /// The validated-questionnaire catalogue in use.
    pub fn validated(&self) -> &ValidatedSurveys {
        self.inner.composer().validated()
    }

    pub async fn create(&self, survey_id: &str, batch: AnswerBatch) -> RepositoryResult<AnswerBatch> {
        self.inner.create(survey_id, batch).await
    }

    pub async fn read(&self, survey_id: &str, id: &str) -> RepositoryResult<Option<AnswerBatch>> {
        self.inner.read(survey_id, id).await
    }

    pub async fn update(&self, survey_id: &str, batch: AnswerBatch) -> RepositoryResult<AnswerBatch> {
        self.inner.update(survey_id, batch).await
    }

    pub async fn update_value<F>(
        &self,
        survey_id: &str,
        id: &str,
        mutate: F,
    ) -> RepositoryResult<AnswerBatch>
    where
        F: FnOnce(&mut AnswerBatch),
    {
        self.inner.update_value(survey_id, id, mutate).await
    }

    pub async fn delete(&self, survey_id: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete(survey_id, id).await
    }

    pub async fn read_all(&self, survey_id: &str) -> RepositoryResult<Vec<AnswerBatch>> {
        self.inner.read_all(survey_id).await
    }

    pub async fn read_first(&self, survey_id: &str) -> RepositoryResult<Option<AnswerBatch>> {
        self.inner.read_first(survey_id).await
    }

    pub async fn delete_batch(&self, survey_id: &str, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(survey_id, ids).await
    }

    pub async fn update_batch(
        &self,
        survey_id: &str,
        batches: Vec<AnswerBatch>,
    ) -> RepositoryResult<Vec<AnswerBatch>> {
        self.inner.update_batch(survey_id, batches).await
    }

    /// Batches a patient submitted within `[from, to]`, oldest first.
    pub async fn read_between(
        &self,
        patient_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<AnswerBatch>> {
        let query = Query::builder()
            .partition(keys::scoped(kind::PATIENT, patient_id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .sort(SortCondition::Between(keys::timestamp(from), keys::timestamp(to)))
            .build();
        let items = self.inner.store().query(query).await?;
        BatchInner::<S>::decode_all(&items)
    }

    /// All batches reachable from a bare id, whichever owner it names.
    ///
    /// Tries the declared owner (survey) partition, then the alternate owner
    /// (patient) index, then the custom-survey discriminator partition. An
    /// unknown id yields an empty list, not an error.
    pub async fn read_for_questionnaire(&self, id: &str) -> RepositoryResult<Vec<AnswerBatch>> {
        let own = self.inner.read_all(id).await?;
        if !own.is_empty() {
            return Ok(own);
        }

        let by_patient = Query::builder()
            .partition(keys::scoped(kind::PATIENT, id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .build();
        let items = self.inner.store().query(by_patient).await?;
        if !items.is_empty() {
            return BatchInner::<S>::decode_all(&items);
        }

        let custom = Query::builder()
            .partition(keys::questionnaire_partition(id, false))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi3))
            .build();
        let items = self.inner.store().query(custom).await?;
        BatchInner::<S>::decode_all(&items)
    }

    /// Batches for a survey within `[from, to]`, oldest first, via the
    /// discriminator index (the primary sort key is id-based, so time ranges
    /// by survey go through here).
    pub async fn read_for_survey_between(
        &self,
        survey_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<AnswerBatch>> {
        let partition =
            keys::questionnaire_partition(survey_id, self.validated().contains(survey_id));
        let query = Query::builder()
            .partition(partition)
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi3))
            .sort(SortCondition::Between(keys::timestamp(from), keys::timestamp(to)))
            .build();
        let items = self.inner.store().query(query).await?;
        BatchInner::<S>::decode_all(&items)
    }

    /// Analytics slice: batches filed under a project/strategy/category
    /// scope.
    pub async fn read_for_outcome(
        &self,
        project_id: &str,
        strategy_id: &str,
        category: OutcomeCategory,
    ) -> RepositoryResult<Vec<AnswerBatch>> {
        let query = Query::builder()
            .partition(keys::outcome_scope(project_id, strategy_id, category))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi2))
            .sort(SortCondition::BeginsWith(keys::sort_prefix(kind::ANSWERS)))
            .build();
        let items = self.inner.store().query(query).await?;
        BatchInner::<S>::decode_all(&items)
    }

    /// Delete unit covering every batch the patient ever submitted, for the
    /// patient-deletion cascade. Keys come straight from the index query, so
    /// the unit is correct regardless of which surveys own the batches.
    pub async fn delete_unit_for_patient(&self, patient_id: &str) -> RepositoryResult<WriteUnit> {
        let query = Query::builder()
            .partition(keys::scoped(kind::PATIENT, patient_id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .build();
        let items = self.inner.store().query(query).await?;
        Ok(WriteUnit::new(items.into_iter().map(|item| WriteRequest::Delete(item.key)).collect()))
    }
}

/// Repository for field-level answers ("entries").
///
/// Owned by their answer batch; time-ranged reads go through the
/// patient-scoped index, analytics through the outcome-scope composite.
pub struct FieldAnswerRepository<S: KeyValueStore> {
    inner: EntryInner<S>,
}

impl<S: KeyValueStore> FieldAnswerRepository<S> {
    pub fn new(store: S) -> Self {
        Self { inner: ChildRepository::from_store(store) }
    }

    pub async fn create(&self, batch_id: &str, entry: FieldAnswer) -> RepositoryResult<FieldAnswer> {
        self.inner.create(batch_id, entry).await
    }

    pub async fn read(&self, batch_id: &str, id: &str) -> RepositoryResult<Option<FieldAnswer>> {
        self.inner.read(batch_id, id).await
    }

    pub async fn update(&self, batch_id: &str, entry: FieldAnswer) -> RepositoryResult<FieldAnswer> {
        self.inner.update(batch_id, entry).await
    }

    pub async fn delete(&self, batch_id: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete(batch_id, id).await
    }

    pub async fn read_all(&self, batch_id: &str) -> RepositoryResult<Vec<FieldAnswer>> {
        self.inner.read_all(batch_id).await
    }

    pub async fn delete_batch(&self, batch_id: &str, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(batch_id, ids).await
    }

    pub async fn update_batch(
        &self,
        batch_id: &str,
        entries: Vec<FieldAnswer>,
    ) -> RepositoryResult<Vec<FieldAnswer>> {
        self.inner.update_batch(batch_id, entries).await
    }

    /// Entries a patient answered within `[from, to]`, oldest first.
    pub async fn read_between(
        &self,
        patient_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<FieldAnswer>> {
        let query = Query::builder()
            .partition(keys::scoped(kind::PATIENT, patient_id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .sort(SortCondition::Between(keys::timestamp(from), keys::timestamp(to)))
            .build();
        let items = self.inner.store().query(query).await?;
        EntryInner::<S>::decode_all(&items)
    }

    /// Analytics slice: entries filed under a project/strategy/category
    /// scope.
    pub async fn read_for_outcome(
        &self,
        project_id: &str,
        strategy_id: &str,
        category: OutcomeCategory,
    ) -> RepositoryResult<Vec<FieldAnswer>> {
        let query = Query::builder()
            .partition(keys::outcome_scope(project_id, strategy_id, category))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi2))
            .sort(SortCondition::BeginsWith(keys::sort_prefix(kind::ENTRY)))
            .build();
        let items = self.inner.store().query(query).await?;
        EntryInner::<S>::decode_all(&items)
    }

    /// Delete unit covering every entry the patient ever answered, for the
    /// patient-deletion cascade.
    pub async fn delete_unit_for_patient(&self, patient_id: &str) -> RepositoryResult<WriteUnit> {
        let query = Query::builder()
            .partition(keys::scoped(kind::PATIENT, patient_id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .build();
        let items = self.inner.store().query(query).await?;
        Ok(WriteUnit::new(items.into_iter().map(|item| WriteRequest::Delete(item.key)).collect()))
    }
}
