//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use cadence_core::domain::GenerationPolicy;
use cadence_core::services::ModerationFilter;
use cadence_infra::database::DatabaseConfig;
use cadence_infra::{JwtConfig, OpenAiConfig};

use crate::background::SchedulerConfig;
use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub openai: OpenAiConfig,
    pub policy: GenerationPolicy,
    pub banned_terms: Option<Vec<String>>,
    pub scheduler: SchedulerConfig,
    pub telemetry: TelemetryConfig,
    /// Generation calls allowed per organization and minute.
    #[cfg(feature = "rate-limit")]
    pub rate_limit: cadence_infra::RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database: None,
            jwt: JwtConfig::default(),
            openai: OpenAiConfig::default(),
            policy: GenerationPolicy::default(),
            banned_terms: None,
            scheduler: SchedulerConfig::default(),
            telemetry: TelemetryConfig::default(),
            #[cfg(feature = "rate-limit")]
            rate_limit: cadence_infra::RateLimitConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let defaults = DatabaseConfig::new(url);
            DatabaseConfig {
                max_connections: parse_var("DB_MAX_CONNECTIONS")
                    .unwrap_or(defaults.max_connections),
                min_connections: parse_var("DB_MIN_CONNECTIONS")
                    .unwrap_or(defaults.min_connections),
                sqlx_logging: parse_flag("DB_LOGGING").unwrap_or(false),
                ..defaults
            }
        });

        let policy = GenerationPolicy::new(
            parse_var("GENERATION_DEFAULT_COUNT").unwrap_or(GenerationPolicy::DEFAULT_COUNT),
            parse_var("GENERATION_MAX_COUNT").unwrap_or(GenerationPolicy::MAX_CEILING),
        );

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            openai: OpenAiConfig::from_env(),
            policy,
            banned_terms: env::var("MODERATION_BANNED_TERMS")
                .ok()
                .map(|raw| parse_terms(&raw)),
            scheduler: SchedulerConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: cadence_infra::RateLimitConfig::from_env(),
        }
    }

    /// Denylist from `MODERATION_BANNED_TERMS`, or the built-in list.
    pub fn moderation(&self) -> ModerationFilter {
        match &self.banned_terms {
            Some(terms) => ModerationFilter::new(terms),
            None => ModerationFilter::default(),
        }
    }
}

pub(crate) fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

pub(crate) fn parse_flag(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
}

pub(crate) fn parse_secs(key: &str) -> Option<Duration> {
    parse_var::<u64>(key)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Split a comma-separated denylist, dropping blank entries.
fn parse_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
