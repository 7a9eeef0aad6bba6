//! Identity resolution port.

use uuid::Uuid;

/// Claims carried by an access token. The organization is the tenant boundary
/// every pipeline operation is scoped to.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub organization_id: Uuid,
    pub subject: String,
}

/// Token service trait - resolves access tokens issued elsewhere.
pub trait TokenService: Send + Sync {
    /// Validate a token and resolve the caller's organization.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
