//! Monthly usage record entity for SeaORM.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usage_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub organization_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: Date,
    pub tokens_used: i64,
    pub images_generated: i64,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for cadence_core::domain::UsageRecord {
    fn from(model: Model) -> Self {
        Self {
            organization_id: model.organization_id,
            month: model.month,
            tokens_used: model.tokens_used,
            images_generated: model.images_generated,
            updated_at: Some(model.updated_at.into()),
        }
    }
}
