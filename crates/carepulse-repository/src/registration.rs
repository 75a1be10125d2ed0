//! Registration repository.

use carepulse_store::{KeyValueStore, Query, QueryIndex, SecondaryIndex, SortCondition};
use carepulse_types::{kind, OutcomeCategory, Registration};
use chrono::{DateTime, Utc};

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::RegistrationKeys;
use crate::error::RepositoryResult;
use crate::keys;

type Inner<S> = ChildRepository<Registration, S, RegistrationKeys>;

/// Repository for outcome registrations under a strategy.
///
/// Time-ranged reads use the strategy-scoped time index; analytics slicing
/// uses the outcome-scope composite index. Both keys are written by the
/// registration composer from the same builders the queries use.
pub struct RegistrationRepository<S: KeyValueStore> {
    inner: Inner<S>,
}

impl<S: KeyValueStore> RegistrationRepository<S> {
    pub fn new(store: S) -> Self {
        Self { inner: ChildRepository::from_store(store) }
    }

    pub async fn create(
        &self,
        strategy_id: &str,
        registration: Registration,
    ) -> RepositoryResult<Registration> {
        self.inner.create(strategy_id, registration).await
    }

    pub async fn read(&self, strategy_id: &str, id: &str) -> RepositoryResult<Option<Registration>> {
        self.inner.read(strategy_id, id).await
    }

    pub async fn update(
        &self,
        strategy_id: &str,
        registration: Registration,
    ) -> RepositoryResult<Registration> {
        self.inner.update(strategy_id, registration).await
    }

    pub async fn update_value<F>(
        &self,
        strategy_id: &str,
        id: &str,
        mutate: F,
    ) -> RepositoryResult<Registration>
    where
        F: FnOnce(&mut Registration),
    {
        self.inner.update_value(strategy_id, id, mutate).await
    }

    pub async fn delete(&self, strategy_id: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete(strategy_id, id).await
    }

    pub async fn read_all(&self, strategy_id: &str) -> RepositoryResult<Vec<Registration>> {
        self.inner.read_all(strategy_id).await
    }

    pub async fn read_first(&self, strategy_id: &str) -> RepositoryResult<Option<Registration>> {
        self.inner.read_first(strategy_id).await
    }

    pub async fn delete_batch(&self, strategy_id: &str, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(strategy_id, ids).await
    }

    pub async fn update_batch(
        &self,
        strategy_id: &str,
        registrations: Vec<Registration>,
    ) -> RepositoryResult<Vec<Registration>> {
        self.inner.update_batch(strategy_id, registrations).await
    }

    /// Delete unit for the batch coordinator (cascade support).
    pub fn delete_unit(&self, strategy_id: &str, ids: &[String]) -> WriteUnit {
        self.inner.delete_unit(strategy_id, ids)
    }

    /// Registrations recorded for a strategy within `[from, to]`, oldest
    /// first.
    pub async fn read_between(
        &self,
        strategy_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Registration>> {
        let query = Query::builder()
            .partition(keys::scoped(kind::STRATEGY, strategy_id))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi1))
            .sort(SortCondition::Between(keys::timestamp(from), keys::timestamp(to)))
            .build();
        let items = self.inner.store().query(query).await?;
        Inner::<S>::decode_all(&items)
    }

    /// Analytics slice: registrations filed under a
    /// project/strategy/category scope.
    pub async fn read_for_outcome(
        &self,
        project_id: &str,
        strategy_id: &str,
        category: OutcomeCategory,
    ) -> RepositoryResult<Vec<Registration>> {
        let query = Query::builder()
            .partition(keys::outcome_scope(project_id, strategy_id, category))
            .index(QueryIndex::Secondary(SecondaryIndex::Gsi2))
            .sort(SortCondition::BeginsWith(keys::sort_prefix(kind::REGISTRATION)))
            .build();
        let items = self.inner.store().query(query).await?;
        Inner::<S>::decode_all(&items)
    }
}
