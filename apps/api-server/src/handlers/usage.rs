//! Usage metering handler.

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;

use cadence_shared::ApiResponse;
use cadence_shared::dto::{UsageQuery, UsageResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Parse a `YYYY-MM` month into its first day.
fn parse_month(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid month '{}', expected YYYY-MM", raw)))
}

/// GET /api/usage?month=YYYY-MM
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<UsageQuery>,
) -> AppResult<HttpResponse> {
    let month = query.month.as_deref().map(parse_month).transpose()?;

    let record = state.usage.usage(identity.organization_id, month).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UsageResponse {
        organization_id: record.organization_id,
        month: record.month,
        tokens_used: record.tokens_used,
        images_generated: record.images_generated,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(
            parse_month("2025-03").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
        );
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("March").is_err());
    }
}
