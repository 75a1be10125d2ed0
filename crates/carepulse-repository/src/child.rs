//! Generic repository for owned (child) entities.
//!
//! One instance serves one entity type. The store backend and the entity's
//! key composer are injected; everything else — id assignment, timestamp
//! stamping, serialization, key recomputation — is shared here so the dozens
//! of per-entity repositories never duplicate it.

use std::marker::PhantomData;

use carepulse_store::{Item, KeyValueStore, Query, SortCondition, WriteRequest};
use carepulse_types::Entity;
use chrono::Utc;
use uuid::Uuid;

use crate::batch::{BatchCoordinator, WriteUnit};
use crate::composer::{compose_item, KeyComposer};
use crate::error::{RepositoryError, RepositoryResult};
use crate::keys;

/// Generic CRUD + list-by-owner repository for one owned entity type.
///
/// # Type Parameters
///
/// * `E` - The entity type.
/// * `S` - The store backend.
/// * `C` - The entity's key composer.
///
/// # Concurrency
///
/// Writes are last-write-wins full-item overwrites; there is no optimistic
/// concurrency token. See [`update_value`](Self::update_value) for the
/// read-modify-write caveat.
pub struct ChildRepository<E, S, C> {
    store: S,
    composer: C,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S, C> ChildRepository<E, S, C>
where
    E: Entity,
    S: KeyValueStore,
    C: KeyComposer<E>,
{
    /// Create a repository over a store with an explicit composer.
    pub fn new(store: S, composer: C) -> Self {
        Self { store, composer, _entity: PhantomData }
    }

    /// The underlying store backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The entity's key composer.
    pub fn composer(&self) -> &C {
        &self.composer
    }

    /// Serialize an entity and attach its composed keys.
    fn encode(&self, owner_id: &str, entity: &E) -> RepositoryResult<Item> {
        let payload = serde_json::to_vec(entity).map_err(RepositoryError::serialization)?;
        Ok(compose_item(&self.composer, owner_id, entity, payload))
    }

    /// Deserialize one item payload.
    pub(crate) fn decode(item: &Item) -> RepositoryResult<E> {
        serde_json::from_slice(&item.payload).map_err(RepositoryError::serialization)
    }

    /// Deserialize a list of item payloads, preserving order.
    pub(crate) fn decode_all(items: &[Item]) -> RepositoryResult<Vec<E>> {
        items.iter().map(Self::decode).collect()
    }

    /// Create an entity under an owner.
    ///
    /// Assigns a fresh id when the entity's id is blank, stamps timestamps,
    /// computes all keys, and performs a single put. Returns the stored
    /// entity.
    pub async fn create(&self, owner_id: &str, mut entity: E) -> RepositoryResult<E> {
        if entity.id().is_empty() {
            entity.assign_id(Uuid::new_v4().to_string());
        }
        entity.touch(Utc::now());
        let item = self.encode(owner_id, &entity)?;
        self.store.put(item).await?;
        Ok(entity)
    }

    /// Point lookup by owner and id. Absence returns `Ok(None)`.
    pub async fn read(&self, owner_id: &str, id: &str) -> RepositoryResult<Option<E>> {
        let key = self.composer.primary_key_for_id(owner_id, id);
        match self.store.get(&key).await? {
            Some(item) => Ok(Some(Self::decode(&item)?)),
            None => Ok(None),
        }
    }

    /// Full-item overwrite of an existing entity.
    ///
    /// The entity must already carry an id. Timestamps and keys are
    /// recomputed; the previous stored state is replaced unconditionally
    /// (last write wins).
    pub async fn update(&self, owner_id: &str, mut entity: E) -> RepositoryResult<E> {
        if entity.id().is_empty() {
            return Err(RepositoryError::Validation(format!(
                "{} update requires an assigned id",
                E::KIND
            )));
        }
        entity.touch(Utc::now());
        let item = self.encode(owner_id, &entity)?;
        self.store.put(item).await?;
        Ok(entity)
    }

    /// Read-modify-write: load the entity, apply `mutate`, then [`update`].
    ///
    /// Not atomic. Two concurrent `update_value` calls on the same id race
    /// and one mutation can be lost; callers needing mutual exclusion must
    /// serialize externally.
    ///
    /// [`update`]: Self::update
    pub async fn update_value<F>(&self, owner_id: &str, id: &str, mutate: F) -> RepositoryResult<E>
    where
        F: FnOnce(&mut E),
    {
        let mut entity = self
            .read(owner_id, id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(keys::scoped(E::KIND, id)))?;
        mutate(&mut entity);
        self.update(owner_id, entity).await
    }

    /// Delete by primary key. No cascade; secondary index entries are
    /// derived from the primary item and disappear with it. Deleting a
    /// missing id is a no-op.
    pub async fn delete(&self, owner_id: &str, id: &str) -> RepositoryResult<()> {
        let key = self.composer.primary_key_for_id(owner_id, id);
        self.store.delete(&key).await?;
        Ok(())
    }

    /// List all children of an owner, in the entity type's fixed sort order.
    pub async fn read_all(&self, owner_id: &str) -> RepositoryResult<Vec<E>> {
        let query = Query::builder()
            .partition(keys::owner_partition(E::OWNER_KIND, owner_id))
            .sort(SortCondition::BeginsWith(keys::sort_prefix(E::KIND)))
            .descending(E::LIST_DESCENDING)
            .build();
        let items = self.store.query(query).await?;
        Self::decode_all(&items)
    }

    /// First child of an owner in the entity type's sort order, if any.
    pub async fn read_first(&self, owner_id: &str) -> RepositoryResult<Option<E>> {
        let query = Query::builder()
            .partition(keys::owner_partition(E::OWNER_KIND, owner_id))
            .sort(SortCondition::BeginsWith(keys::sort_prefix(E::KIND)))
            .descending(E::LIST_DESCENDING)
            .limit(1)
            .build();
        let items = self.store.query(query).await?;
        items.first().map(Self::decode).transpose()
    }

    /// Build a put unit for the batch coordinator, stamping ids and
    /// timestamps exactly as [`create`](Self::create)/[`update`](Self::update)
    /// do. The entities are mutated in place so callers keep the assigned
    /// ids.
    pub fn put_unit(&self, owner_id: &str, entities: &mut [E]) -> RepositoryResult<WriteUnit> {
        let now = Utc::now();
        let mut requests = Vec::with_capacity(entities.len());
        for entity in entities.iter_mut() {
            if entity.id().is_empty() {
                entity.assign_id(Uuid::new_v4().to_string());
            }
            entity.touch(now);
            requests.push(WriteRequest::Put(self.encode(owner_id, entity)?));
        }
        Ok(WriteUnit::new(requests))
    }

    /// Build a delete unit for the batch coordinator.
    pub fn delete_unit(&self, owner_id: &str, ids: &[String]) -> WriteUnit {
        WriteUnit::new(
            ids.iter()
                .map(|id| WriteRequest::Delete(self.composer.primary_key_for_id(owner_id, id)))
                .collect(),
        )
    }

    /// Overwrite many entities via the batch coordinator. Chunked below the
    /// store's per-call limit; atomic only within each chunk.
    pub async fn update_batch(&self, owner_id: &str, mut entities: Vec<E>) -> RepositoryResult<Vec<E>> {
        let unit = self.put_unit(owner_id, &mut entities)?;
        BatchCoordinator::new(&self.store).submit(vec![unit]).await?;
        Ok(entities)
    }

    /// Delete many ids via the batch coordinator. Chunked below the store's
    /// per-call limit; atomic only within each chunk.
    pub async fn delete_batch(&self, owner_id: &str, ids: &[String]) -> RepositoryResult<()> {
        let unit = self.delete_unit(owner_id, ids);
        BatchCoordinator::new(&self.store).submit(vec![unit]).await?;
        Ok(())
    }
}

impl<E, S, C> ChildRepository<E, S, C>
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
    use carepulse_types::{Patient, Tag};

    fn patient(name: &str) -> Patient {
        Patient {
            id: String::new(),
            name: name.to_string(),
            email: None,
            phone: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn repo(store: MemoryStore) -> ChildRepository<Patient, MemoryStore, BasicKeys<Patient>> {
        ChildRepository::from_store(store)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = repo(MemoryStore::new());

        let created = repo.create("p1", patient("Alice")).await.unwrap();
        assert!(!created.id.is_empty());
        assert!(created.created_at.is_some());
        assert_eq!(created.created_at, created.updated_at);

        let found = repo.read("p1", &created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_create_keeps_existing_id() {
        let repo = repo(MemoryStore::new());
        let mut entity = patient("Alice");
        entity.id = "fixed-id".to_string();

        let created = repo.create("p1", entity).await.unwrap();
        assert_eq!(created.id, "fixed-id");
    }

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let repo = repo(MemoryStore::new());
        assert!(repo.read("p1", "ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_requires_id() {
        let repo = repo(MemoryStore::new());
        let err = repo.update("p1", patient("Alice")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_value_missing_is_not_found() {
        let repo = repo(MemoryStore::new());
        let err = repo
            .update_value("p1", "ghost", |p| p.name = "Bob".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_value_applies_mutation() {
        let repo = repo(MemoryStore::new());
        let created = repo.create("p1", patient("Alice")).await.unwrap();

        let updated = repo
            .update_value("p1", &created.id, |p| p.tags.push("high-risk".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.tags, vec!["high-risk".to_string()]);

        let found = repo.read("p1", &created.id).await.unwrap().unwrap();
        assert_eq!(found.tags, vec!["high-risk".to_string()]);
        assert_eq!(found.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_read_all_is_owner_scoped() {
        let store = MemoryStore::new();
        let patients = repo(store.clone());
        let tags: ChildRepository<Tag, MemoryStore, BasicKeys<Tag>> =
            ChildRepository::from_store(store);

        patients.create("p1", patient("Alice")).await.unwrap();
        patients.create("p1", patient("Bob")).await.unwrap();
        patients.create("p2", patient("Carol")).await.unwrap();
        // A different entity kind under an unrelated owner must not leak in.
        tags.create("alice", Tag {
            id: String::new(),
            name: "high-risk".to_string(),
            created_at: None,
            updated_at: None,
        })
        .await
        .unwrap();

        let listed = patients.read_all("p1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|p| p.name == "Alice" || p.name == "Bob"));

        assert!(patients.read_first("p1").await.unwrap().is_some());
        assert!(patients.read_first("empty-project").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = repo(MemoryStore::new());
        let created = repo.create("p1", patient("Alice")).await.unwrap();

        repo.delete("p1", &created.id).await.unwrap();
        assert!(repo.read("p1", &created.id).await.unwrap().is_none());
        repo.delete("p1", &created.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_batch_roundtrip() {
        let repo = repo(MemoryStore::new());
        let stored = repo
            .update_batch("p1", vec![patient("Alice"), patient("Bob")])
            .await
            .unwrap();
        assert!(stored.iter().all(|p| !p.id.is_empty()));

        let listed = repo.read_all("p1").await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}
