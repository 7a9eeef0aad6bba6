//! Brand profile entity for SeaORM.
//!
//! Profiles are written through the profile endpoints or by another service;
//! the pipeline only reads them.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "brand_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub organization_id: Uuid,
    pub company_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub audience: Option<String>,
    pub tone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub goals: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub themes: Option<String>,
    pub channels: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for cadence_core::domain::BrandProfile {
    fn from(model: Model) -> Self {
        Self {
            organization_id: model.organization_id,
            company_name: model.company_name,
            description: model.description,
            audience: model.audience,
            tone: model.tone,
            goals: model.goals,
            themes: model.themes,
            channels: model.channels,
            updated_at: Some(model.updated_at.into()),
        }
    }
}

impl From<cadence_core::domain::BrandProfile> for ActiveModel {
    fn from(profile: cadence_core::domain::BrandProfile) -> Self {
        let updated_at = profile.updated_at.unwrap_or_else(chrono::Utc::now);
        Self {
            organization_id: Set(profile.organization_id),
            company_name: Set(profile.company_name),
            description: Set(profile.description),
            audience: Set(profile.audience),
            tone: Set(profile.tone),
            goals: Set(profile.goals),
            themes: Set(profile.themes),
            channels: Set(profile.channels),
            updated_at: Set(updated_at.into()),
        }
    }
}
