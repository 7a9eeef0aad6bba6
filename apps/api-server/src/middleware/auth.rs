//! Authentication extractor - resolves the caller's organization.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};
use uuid::Uuid;

use cadence_core::PipelineError;
use cadence_core::ports::{AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated caller.
///
/// Every organization-scoped handler takes this; the organization id comes
/// from the token, never from the request body or path.
/// ```ignore
/// async fn list_posts(identity: Identity) -> impl Responder {
///     format!("Posts of {}", identity.organization_id)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub organization_id: Uuid,
    pub subject: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            organization_id: claims.organization_id,
            subject: claims.subject,
        }
    }
}

fn rejected(err: AuthError) -> AppError {
    tracing::debug!(error = %err, "Request rejected by identity resolver");
    PipelineError::from(err).into()
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                tracing::error!("AppState not found in app data");
                return ready(Err(AppError::Internal(
                    "Server configuration error".to_string(),
                )));
            }
        };

        // Extract Bearer token from Authorization header
        let auth_header = match req.headers().get(header::AUTHORIZATION) {
            Some(value) => value,
            None => return ready(Err(rejected(AuthError::MissingAuth))),
        };

        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => {
                return ready(Err(rejected(AuthError::InvalidToken(
                    "Invalid authorization header".to_string(),
                ))));
            }
        };

        let token = match auth_str.strip_prefix("Bearer ") {
            Some(t) => t,
            None => {
                return ready(Err(rejected(AuthError::InvalidToken(
                    "Expected Bearer token".to_string(),
                ))));
            }
        };

        match state.token_service.validate_token(token) {
            Ok(claims) => ready(Ok(Identity::from(claims))),
            Err(e) => ready(Err(rejected(e))),
        }
    }
}
