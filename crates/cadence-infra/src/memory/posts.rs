use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use cadence_core::domain::{Post, PostStatus};
use cadence_core::error::RepoError;
use cadence_core::ports::PostRepository;

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert_batch(&self, posts: Vec<Post>) -> Result<Vec<Post>, RepoError> {
        let mut store = self.store.write().await;

        if let Some(dup) = posts.iter().find(|p| store.contains_key(&p.id)) {
            return Err(RepoError::Constraint(format!("post {} already exists", dup.id)));
        }

        for post in &posts {
            store.insert(post.id, post.clone());
        }
        Ok(posts)
    }

    async fn find_by_id(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .get(&id)
            .filter(|p| p.organization_id == organization_id)
            .cloned())
    }

    async fn list(
        &self,
        organization_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|p| p.organization_id == organization_id)
            .filter(|p| status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();

        // Unscheduled posts sort last, as NULLs do in PostgreSQL.
        posts.sort_by_key(|p| (p.scheduled_at.is_none(), p.scheduled_at, p.created_at));
        Ok(posts)
    }

    async fn schedule(
        &self,
        organization_id: Uuid,
        id: Uuid,
        publish_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;

        let Some(post) = store
            .get_mut(&id)
            .filter(|p| p.organization_id == organization_id)
        else {
            return Ok(0);
        };

        match post.schedule(publish_at, now) {
            Ok(()) => Ok(1),
            Err(_) => Ok(0),
        }
    }

    async fn publish_due(
        &self,
        organization_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;

        let mut published = 0;
        for post in store
            .values_mut()
            .filter(|p| organization_id.is_none_or(|org| p.organization_id == org))
        {
            if post.publish(now).is_ok() {
                published += 1;
            }
        }
        Ok(published)
    }
}
