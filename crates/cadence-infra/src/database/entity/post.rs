//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use cadence_core::domain::PostStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub organization_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub hashtags: Json,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_prompt: Option<String>,
    pub image_url: Option<String>,
    pub status: Status,
    pub scheduled_at: Option<DateTimeWithTimeZone>,
    pub flagged: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Stored post status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "published")]
    Published,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Scheduled => Status::Scheduled,
            PostStatus::Published => Status::Published,
        }
    }
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Scheduled => PostStatus::Scheduled,
            Status::Published => PostStatus::Published,
        }
    }
}

/// Hashtags are stored as a JSON array; anything else reads back as empty.
fn hashtags_from_json(value: Json) -> Vec<String> {
    serde_json::from_value(value).unwrap_or_default()
}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for cadence_core::domain::Post {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            organization_id: model.organization_id,
            text: model.text,
            hashtags: hashtags_from_json(model.hashtags),
            image_prompt: model.image_prompt,
            image_url: model.image_url,
            status: model.status.into(),
            scheduled_at: model.scheduled_at.map(Into::into),
            flagged: model.flagged,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<cadence_core::domain::Post> for ActiveModel {
    fn from(post: cadence_core::domain::Post) -> Self {
        Self {
            id: Set(post.id),
            organization_id: Set(post.organization_id),
            text: Set(post.text),
            hashtags: Set(Json::from(post.hashtags)),
            image_prompt: Set(post.image_prompt),
            image_url: Set(post.image_url),
            status: Set(post.status.into()),
            scheduled_at: Set(post.scheduled_at.map(Into::into)),
            flagged: Set(post.flagged),
            created_at: Set(post.created_at.into()),
            updated_at: Set(post.updated_at.into()),
        }
    }
}
