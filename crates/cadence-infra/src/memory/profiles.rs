use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use cadence_core::domain::BrandProfile;
use cadence_core::error::RepoError;
use cadence_core::ports::{BaseRepository, ProfileRepository};

/// In-memory brand profiles keyed by organization.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    store: RwLock<HashMap<Uuid, BrandProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<BrandProfile, Uuid> for InMemoryProfileRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BrandProfile>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, mut profile: BrandProfile) -> Result<BrandProfile, RepoError> {
        profile.updated_at.get_or_insert_with(chrono::Utc::now);
        self.store
            .write()
            .await
            .insert(profile.organization_id, profile.clone());
        Ok(profile)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.store.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {}
