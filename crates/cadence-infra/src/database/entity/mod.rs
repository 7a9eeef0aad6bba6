//! SeaORM entities and their conversions to domain types.

pub mod brand_profile;
pub mod post;
pub mod usage_record;
