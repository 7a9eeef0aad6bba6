//! Brand profile handlers.

use actix_web::{HttpResponse, web};

use cadence_core::domain::BrandProfile;
use cadence_core::ports::{BaseRepository, Clock};
use cadence_shared::ApiResponse;
use cadence_shared::dto::BrandProfileDto;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn to_dto(profile: BrandProfile) -> BrandProfileDto {
    BrandProfileDto {
        company_name: profile.company_name,
        description: profile.description,
        audience: profile.audience,
        tone: profile.tone,
        goals: profile.goals,
        themes: profile.themes,
        channels: profile.channels,
    }
}

/// GET /api/profile
pub async fn get(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let profile = state
        .profiles
        .find_by_id(identity.organization_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No brand profile for this organization".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_dto(profile))))
}

/// PUT /api/profile
pub async fn put(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<BrandProfileDto>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let profile = BrandProfile {
        organization_id: identity.organization_id,
        company_name: req.company_name,
        description: req.description,
        audience: req.audience,
        tone: req.tone,
        goals: req.goals,
        themes: req.themes,
        channels: req.channels,
        updated_at: Some(state.clock.now()),
    };

    let saved = state.profiles.save(profile).await?;
    tracing::info!(organization_id = %saved.organization_id, "Brand profile saved");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_dto(saved))))
}

/// DELETE /api/profile
pub async fn delete(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.profiles.delete(identity.organization_id).await?;
    tracing::info!(organization_id = %identity.organization_id, "Brand profile deleted");

    Ok(HttpResponse::NoContent().finish())
}
