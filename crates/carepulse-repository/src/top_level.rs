//! Generic repository for top-level entities.
//!
//! Top-level entities (projects, accounts, roles, scheduled jobs) have no
//! real owner. Every call substitutes the fixed `META` sentinel owner and
//! delegates to [`ChildRepository`], so the owned-entity machinery is reused
//! without duplication.

use carepulse_store::KeyValueStore;
use carepulse_types::{Entity, META_OWNER};

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::KeyComposer;
use crate::error::RepositoryResult;

/// CRUD repository for one top-level entity type.
pub struct TopLevelRepository<E, S, C> {
    inner: ChildRepository<E, S, C>,
}

impl<E, S, C> TopLevelRepository<E, S, C>
where
    E: Entity,
    S: KeyValueStore,
    C: KeyComposer<E>,
{
    pub fn new(store: S, composer: C) -> Self {
        Self { inner: ChildRepository::new(store, composer) }
    }

    /// The underlying child repository (and through it, the store).
    pub(crate) fn inner(&self) -> &ChildRepository<E, S, C> {
        &self.inner
    }

    pub async fn create(&self, entity: E) -> RepositoryResult<E> {
        self.inner.create(META_OWNER, entity).await
    }

    pub async fn read(&self, id: &str) -> RepositoryResult<Option<E>> {
        self.inner.read(META_OWNER, id).await
    }

    pub async fn update(&self, entity: E) -> RepositoryResult<E> {
        self.inner.update(META_OWNER, entity).await
    }

    pub async fn update_value<F>(&self, id: &str, mutate: F) -> RepositoryResult<E>
    where
        F: FnOnce(&mut E),
    {
        self.inner.update_value(META_OWNER, id, mutate).await
    }

    pub async fn delete(&self, id: &str) -> RepositoryResult<()> {
        self.inner.delete(META_OWNER, id).await
    }

    pub async fn read_all(&self) -> RepositoryResult<Vec<E>> {
        self.inner.read_all(META_OWNER).await
    }

    pub async fn read_first(&self) -> RepositoryResult<Option<E>> {
        self.inner.read_first(META_OWNER).await
    }

    pub async fn update_batch(&self, entities: Vec<E>) -> RepositoryResult<Vec<E>> {
        self.inner.update_batch(META_OWNER, entities).await
    }

    pub async fn delete_batch(&self, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(META_OWNER, ids).await
    }

    /// Build a delete unit for the batch coordinator.
    pub fn delete_unit(&self, ids: &[String]) -> WriteUnit {
        self.inner.delete_unit(META_OWNER, ids)
    }
}

impl<E, S, C> TopLevelRepository<E, S, C>
where
    E: Entity,
    S: KeyValueStore,
    C: KeyComposer<E> + Default,
{
    /// Create a repository using the entity's default composer.
    pub fn from_store(store: S) -> Self {
        Self::new(store, C::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::BasicKeys;
    use carepulse_store::MemoryStore;
    use carepulse_types::Account;

    fn account(email: &str) -> Account {
        Account {
            id: String::new(),
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_top_level_crud_under_meta_sentinel() {
        let repo: TopLevelRepository<Account, MemoryStore, BasicKeys<Account>> =
            TopLevelRepository::from_store(MemoryStore::new());

        let created = repo.create(account("admin@clinic.example")).await.unwrap();
        assert!(!created.id.is_empty());

        let found = repo.read(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);

        repo.create(account("nurse@clinic.example")).await.unwrap();
        assert_eq!(repo.read_all().await.unwrap().len(), 2);

        repo.delete(&created.id).await.unwrap();
        assert!(repo.read(&created.id).await.unwrap().is_none());
    }
}
