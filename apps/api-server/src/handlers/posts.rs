//! Post generation, listing and scheduling handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use cadence_core::domain::{Post, PostStatus};
use cadence_shared::ApiResponse;
use cadence_shared::dto::{
    GenerateDraftsRequest, PostListQuery, PostResponse, PublishDueResponse, SchedulePostRequest,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::middleware::rate_limit::enforce_generation_limit;
use crate::state::AppState;

pub(crate) fn to_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        organization_id: post.organization_id,
        text: post.text,
        hashtags: post.hashtags,
        image_prompt: post.image_prompt,
        image_url: post.image_url,
        status: post.status.to_string(),
        scheduled_at: post.scheduled_at,
        flagged: post.flagged,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

/// An empty body asks for the default count; anything else must be valid JSON.
fn parse_generate_body(body: &[u8]) -> AppResult<GenerateDraftsRequest> {
    if body.trim_ascii().is_empty() {
        return Ok(GenerateDraftsRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid generation request: {e}")))
}

/// POST /api/posts/generate
pub async fn generate(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let req = parse_generate_body(&body)?;
    tracing::debug!(
        organization_id = %identity.organization_id,
        subject = %identity.subject,
        count = ?req.count,
        "Generation requested"
    );

    enforce_generation_limit(state.rate_limiter.as_deref(), identity.organization_id).await?;

    let posts = state
        .pipeline
        .generate_and_persist(identity.organization_id, req.count)
        .await?;

    let flagged = posts.iter().filter(|p| p.flagged).count();
    let message = format!("{} drafts generated, {} flagged for review", posts.len(), flagged);
    let posts: Vec<PostResponse> = posts.into_iter().map(to_response).collect();

    Ok(HttpResponse::Created().json(ApiResponse::ok_with_message(posts, message)))
}

/// GET /api/posts?status=
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PostListQuery>,
) -> AppResult<HttpResponse> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<PostStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let posts = state
        .scheduling
        .posts(identity.organization_id, status)
        .await?;

    let posts: Vec<PostResponse> = posts.into_iter().map(to_response).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(posts)))
}

/// GET /api/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state
        .scheduling
        .post(identity.organization_id, path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// POST /api/posts/{id}/schedule
pub async fn schedule(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SchedulePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .scheduling
        .schedule(identity.organization_id, path.into_inner(), body.publish_at)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_response(post))))
}

/// POST /api/posts/publish-due
pub async fn publish_due(
    state: web::Data<AppState>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let published = state
        .scheduling
        .publish_due(identity.organization_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(PublishDueResponse { published })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_uses_default_count() {
        assert_eq!(parse_generate_body(b"").unwrap().count, None);
        assert_eq!(parse_generate_body(b"  \n").unwrap().count, None);
        assert_eq!(parse_generate_body(b"{}").unwrap().count, None);
        assert_eq!(parse_generate_body(br#"{"count": 3}"#).unwrap().count, Some(3));
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(matches!(
            parse_generate_body(br#"{"count":"3"}"#),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_generate_body(b"count=3"),
            Err(AppError::BadRequest(_))
        ));
    }
}
