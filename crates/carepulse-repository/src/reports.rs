//! Report and sendout-frequency repositories.

use carepulse_store::KeyValueStore;
use carepulse_types::{Report, SendoutFrequency};

use crate::batch::WriteUnit;
use crate::child::ChildRepository;
use crate::composer::BasicKeys;
use crate::error::RepositoryResult;

/// Reports of a project. Listings are newest-first (the entity's fixed
/// ordering flag).
pub type ReportRepository<S> = ChildRepository<Report, S, BasicKeys<Report>>;

type Inner<S> = ChildRepository<SendoutFrequency, S, BasicKeys<SendoutFrequency>>;

/// Repository for sendout frequencies.
///
/// Membership lives inside the entity as an id list, so removing a patient
/// is an entity rewrite, not a key operation. The cascade helper below
/// builds that rewrite as a coordinator unit.
pub struct SendoutFrequencyRepository<S: KeyValueStore> {
    inner: Inner<S>,
}

impl<S: KeyValueStore> SendoutFrequencyRepository<S> {
    pub fn new(store: S) -> Self {
        Self { inner: ChildRepository::from_store(store) }
    }

    pub async fn create(
        &self,
        project_id: &str,
        frequency: SendoutFrequency,
    ) -> RepositoryResult<SendoutFrequency> {
        self.inner.create(project_id, frequency).await
    }

    pub async fn read(
        &self,
        project_id: &str,
        id: &str,
    ) -> RepositoryResult<Option<SendoutFrequency>> {
        self.inner.read(project_id, id).await
    }

    pub async fn update(
        &self,
        project_id: &str,
        frequency: SendoutFrequency,
    ) -> RepositoryResult<SendoutFrequency> {
        self.inner.update(project_id, frequency).await
    }

    pub async fn update_value<F>(
        &self,
        project_id: &str,
        id: &str,
        mutate: F,
    ) -> RepositoryResult<SendoutFrequency>
    where
        F: FnOnce(&mut SendoutFrequency),
    {
        self.inner.update_value(project_id, id, mutate).await
    }

    pub async fn delete(&self, project_id: &str, id: &str) -> RepositoryResult<()> {
        self.inner.delete(project_id, id).await
    }

    pub async fn read_all(&self, project_id: &str) -> RepositoryResult<Vec<SendoutFrequency>> {
        self.inner.read_all(project_id).await
    }

    /// Put unit rewriting every frequency that still lists the patient, with
    /// the patient removed. Part of the patient-deletion cascade.
    ///
    /// Rerunning after a partial cascade is safe: frequencies already
    /// rewritten no longer list the patient and drop out of the unit.
    pub async fn membership_removal_unit(
        &self,
        project_id: &str,
        patient_id: &str,
    ) -> RepositoryResult<WriteUnit> {
        let mut members: Vec<SendoutFrequency> = self
            .inner
            .read_all(project_id)
            .await?
            .into_iter()
            .filter(|f| f.patient_ids.iter().any(|id| id == patient_id))
            .collect();
        for frequency in &mut members {
            frequency.patient_ids.retain(|id| id != patient_id);
        }
        self.inner.put_unit(project_id, &mut members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::BatchCoordinator;
    use carepulse_store::MemoryStore;

    #[tokio::test]
    async fn test_membership_removal_unit() {
        let store = MemoryStore::new();
        let repo = SendoutFrequencyRepository::new(store.clone());

        let weekly = repo
            .create("p1", SendoutFrequency {
                id: String::new(),
                cadence_days: 7,
                patient_ids: vec!["alice".to_string(), "bob".to_string()],
                created_at: None,
                updated_at: None,
            })
            .await
            .unwrap();

        let unit = repo.membership_removal_unit("p1", "alice").await.unwrap();
        assert_eq!(unit.len(), 1);
        BatchCoordinator::new(store).submit(vec![unit]).await.unwrap();

        let after = repo.read("p1", &weekly.id).await.unwrap().unwrap();
        assert_eq!(after.patient_ids, vec!["bob".to_string()]);

        // A second removal pass has nothing left to rewrite.
        let empty = repo.membership_removal_unit("p1", "alice").await.unwrap();
        assert!(empty.is_empty());
    }
}
