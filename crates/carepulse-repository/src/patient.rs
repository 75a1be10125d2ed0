//! Patient repository.

use carepulse_store::KeyValueStore;
use carepulse_types::Patient;

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::BasicKeys;
use crate::error::RepositoryResult;

/// Repository for patients of a project.
///
/// Beyond the generic operations, this adds the tag-containment filter.
/// Tags participate in no index key, so the filter reads the project's
/// patients and matches client-side; there is no index to consult.
pub struct PatientRepository<S: KeyValueStore> {
    inner: ChildRepository<Patient, S, BasicKeys<Patient>>,
}

impl<S: KeyValueStore> PatientRepository<S> {
    pub fn new(store: S) -> Self {
        Self { inner: ChildRepository::from_store(store) }
    }

    pub async fn create(&self, project_id: &str, patient: Patient) -> RepositoryResult<Patient> {
        self.inner.create(project_id, patient).await
    }

    pub async fn read(&self, project_id: &str, id: &str) -> RepositoryResult<Option<Patient>> {
        self.inner.read(project_id, id).await
    }

    pub async fn update(&self, project_id: &str, patient: Patient) -> RepositoryResult<Patient> {
        self.inner.update(project_id, patient).await
    }

    pub async fn update_value<F>(
        &self,
        project_id: &str,
        id: &str,
        mutate: F,
    ) -> RepositoryResult<Patient>
    where
        F: FnOnce(&mut Patient),
    {
        self.inner.update_value(project_id, id, mutate).await
    }

    pub async fn delete(&self, project_id: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete(project_id, id).await
    }

    pub async fn read_all(&self, project_id: &str) -> RepositoryResult<Vec<Patient>> {
        self.inner.read_all(project_id).await
    }

    pub async fn read_first(&self, project_id: &str) -> RepositoryResult<Option<Patient>> {
        self.inner.read_first(project_id).await
    }

    pub async fn delete_batch(&self, project_id: &str, ids: &[String]) -> RepositoryResult<()> {
        self.inner.delete_batch(project_id, ids).await
    }

    pub async fn update_batch(
        &self,
        project_id: &str,
        patients: Vec<Patient>,
    ) -> RepositoryResult<Vec<Patient>> {
        self.inner.update_batch(project_id, patients).await
    }

    /// Build a delete unit for the batch coordinator (cascade support).
    pub fn delete_unit(&self, project_id: &str, ids: &[String]) -> WriteUnit {
        self.inner.delete_unit(project_id, ids)
    }

    /// All patients of a project carrying the given tag.
    ///
    /// Client-side filter over the owner listing; expensive for large
    /// projects, used sparingly.
    pub async fn read_with_tag(&self, project_id: &str, tag: &str) -> RepositoryResult<Vec<Patient>> {
        let patients = self.inner.read_all(project_id).await?;
        Ok(patients.into_iter().filter(|p| p.tags.iter().any(|t| t == tag)).collect())
    }
}
