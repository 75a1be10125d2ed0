//! Tag repository.

use carepulse_store::KeyValueStore;
use carepulse_types::Tag;

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::BasicKeys;
use crate::error::RepositoryResult;

type Inner<S> = ChildRepository<Tag, S, BasicKeys<Tag>>;

/// Repository for a patient's tags.
///
/// No tag field participates in a key, so renaming is a true partial update
/// through `update_value` — no delete-and-recreate is needed.
pub struct TagRepository<S: KeyValueStore> {
    inner: Inner<S>,
}

impl<S: KeyValueStore> TagRepository<S> {
    pub fn new(store: S) -> Self {
        Self { inner: ChildRepository::from_store(store) }
    }

    pub async fn create(&self, patient_id: &str, tag: Tag) -> RepositoryResult<Tag> {
        self.inner.create(patient_id, tag).await
    }

    pub async fn read(&self, patient_id: &str, id: &str) -> RepositoryResult<Option<Tag>> {
        self.inner.read(patient_id, id).await
    }

    pub async fn update(&self, patient_id: &str, tag: Tag) -> RepositoryResult<Tag> {
        self.inner.update(patient_id, tag).await
    }

    pub async fn delete(&self, patient_id: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete(patient_id, id).await
    }

    pub async fn read_all(&self, patient_id: &str) -> RepositoryResult<Vec<Tag>> {
        self.inner.read_all(patient_id).await
    }

    pub async fn delete_batch(&self, patient_id: &str, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(patient_id, ids).await
    }

    /// Find tags by exact name. Client-side filter over the owner listing.
    pub async fn read_by_name(&self, patient_id: &str, name: &str) -> RepositoryResult<Vec<Tag>> {
        let tags = self.inner.read_all(patient_id).await?;
        Ok(tags.into_iter().filter(|t| t.name == name).collect())
    }

    /// Rename a tag in place.
    pub async fn rename(&self, patient_id: &str, id: &str, name: &str) -> RepositoryResult<Tag> {
        self.inner.update_value(patient_id, id, |tag| tag.name = name.to_string()).await
    }

    /// Delete unit for specific tag ids (cascade support).
    pub fn delete_unit(&self, patient_id: &str, ids: &[String]) -> WriteUnit {
        self.inner.delete_unit(patient_id, ids)
    }

    /// Delete unit covering all of a patient's tags, for the
    /// patient-deletion cascade.
    pub async fn delete_unit_for_patient(&self, patient_id: &str) -> RepositoryResult<WriteUnit> {
        let tags = self.inner.read_all(patient_id).await?;
        let ids: Vec<String> = tags.into_iter().map(|t| t.id).collect();
        Ok(self.inner.delete_unit(patient_id, &ids))
    }
}
