//! PostgreSQL repository implementations.
//!
//! Status changes and usage increments are single conditional statements, so
//! the database serialises concurrent callers.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use cadence_core::domain::{Post, PostStatus, UsageDelta, UsageRecord};
use cadence_core::error::RepoError;
use cadence_core::ports::{PostRepository, ProfileRepository, UsageRepository};

use super::entity::brand_profile::Entity as ProfileEntity;
use super::entity::post::{self, Entity as PostEntity};
use super::entity::usage_record::{self, Entity as UsageEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL brand profile repository.
pub type PostgresProfileRepository = PostgresBaseRepository<ProfileEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL usage repository.
pub type PostgresUsageRepository = PostgresBaseRepository<UsageEntity>;

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert_batch(&self, posts: Vec<Post>) -> Result<Vec<Post>, RepoError> {
        if posts.is_empty() {
            return Ok(posts);
        }

        let models: Vec<post::ActiveModel> = posts.iter().cloned().map(Into::into).collect();

        let txn = self.db.begin().await.map_err(map_db_err)?;
        PostEntity::insert_many(models)
            .exec_without_returning(&txn)
            .await
            .map_err(map_db_err)?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(count = posts.len(), "Inserted posts");
        Ok(posts)
    }

    async fn find_by_id(
        &self,
        organization_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(post::Column::OrganizationId.eq(organization_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(
        &self,
        organization_id: Uuid,
        status: Option<PostStatus>,
    ) -> Result<Vec<Post>, RepoError> {
        let mut query = PostEntity::find().filter(post::Column::OrganizationId.eq(organization_id));
        if let Some(status) = status {
            query = query.filter(post::Column::Status.eq(post::Status::from(status)));
        }

        let result = query
            .order_by_asc(post::Column::ScheduledAt)
            .order_by_asc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn schedule(
        &self,
        organization_id: Uuid,
        id: Uuid,
        publish_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let schedulable = PostStatus::schedulable().map(post::Status::from);

        let result = PostEntity::update_many()
            .col_expr(post::Column::Status, Expr::value(post::Status::Scheduled))
            .col_expr(post::Column::ScheduledAt, Expr::value(publish_at.fixed_offset()))
            .col_expr(post::Column::UpdatedAt, Expr::value(now.fixed_offset()))
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::OrganizationId.eq(organization_id))
            .filter(post::Column::Status.is_in(schedulable))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    async fn publish_due(
        &self,
        organization_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<u64, RepoError> {
        let mut update = PostEntity::update_many()
            .col_expr(post::Column::Status, Expr::value(post::Status::Published))
            .col_expr(post::Column::UpdatedAt, Expr::value(now.fixed_offset()))
            .filter(post::Column::Status.eq(post::Status::Scheduled))
            .filter(post::Column::ScheduledAt.lte(now.fixed_offset()));
        if let Some(organization_id) = organization_id {
            update = update.filter(post::Column::OrganizationId.eq(organization_id));
        }

        let result = update.exec(&self.db).await.map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

#[async_trait]
impl UsageRepository for PostgresUsageRepository {
    async fn increment(
        &self,
        organization_id: Uuid,
        month: NaiveDate,
        delta: UsageDelta,
        now: DateTime<Utc>,
    ) -> Result<UsageRecord, RepoError> {
        let record = usage_record::ActiveModel {
            organization_id: Set(organization_id),
            month: Set(month),
            tokens_used: Set(delta.tokens),
            images_generated: Set(delta.images),
            updated_at: Set(now.fixed_offset()),
        };

        let model = UsageEntity::insert(record)
            .on_conflict(
                OnConflict::columns([
                    usage_record::Column::OrganizationId,
                    usage_record::Column::Month,
                ])
                .value(
                    usage_record::Column::TokensUsed,
                    Expr::cust("usage_records.tokens_used + excluded.tokens_used"),
                )
                .value(
                    usage_record::Column::ImagesGenerated,
                    Expr::cust("usage_records.images_generated + excluded.images_generated"),
                )
                .update_column(usage_record::Column::UpdatedAt)
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.into())
    }

    async fn find(
        &self,
        organization_id: Uuid,
        month: NaiveDate,
    ) -> Result<Option<UsageRecord>, RepoError> {
        let result = UsageEntity::find_by_id((organization_id, month))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}
