//! Application state - shared across all handlers.

use std::sync::Arc;

use thiserror::Error;

use cadence_core::error::GenerationError;
use cadence_core::ports::{
    Clock, PostRepository, ProfileRepository, RateLimiter, SystemClock, TextGenerator,
    TokenService, UsageRepository,
};
use cadence_core::services::{
    ContentGenerator, PipelineOrchestrator, SchedulingEngine, UsageMeter,
};
use cadence_infra::{
    InMemoryPostRepository, InMemoryProfileRepository, InMemoryUsageRepository, JwtTokenService,
    OpenAiTextGenerator,
};

#[cfg(feature = "postgres")]
use cadence_infra::{
    DatabaseConnections, PostgresPostRepository, PostgresProfileRepository,
    PostgresUsageRepository,
};

use crate::config::AppConfig;

/// The three stores the pipeline runs on.
#[derive(Clone)]
pub struct Stores {
    pub profiles: Arc<dyn ProfileRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub usage: Arc<dyn UsageRepository>,
}

impl Stores {
    pub fn in_memory() -> Self {
        Self {
            profiles: Arc::new(InMemoryProfileRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            usage: Arc::new(InMemoryUsageRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(connections: &DatabaseConnections) -> Self {
        Self {
            profiles: Arc::new(PostgresProfileRepository::new(connections.main.clone())),
            posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
            usage: Arc::new(PostgresUsageRepository::new(connections.main.clone())),
        }
    }

    /// Connect to the configured database.
    ///
    /// Memory is only used when no `DATABASE_URL` is configured; a configured
    /// database that cannot be reached stops startup.
    async fn connect(config: &AppConfig) -> Result<Self, StartupError> {
        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Ok(Self::in_memory());
        };

        #[cfg(feature = "postgres")]
        let stores = DatabaseConnections::init(db_config)
            .await
            .map(|connections| Self::postgres(&connections))
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to connect to database");
                StartupError::Database(e.to_string())
            });

        #[cfg(not(feature = "postgres"))]
        let stores = {
            tracing::error!(
                max_connections = db_config.max_connections,
                "DATABASE_URL is set but the server was built without the postgres feature"
            );
            Err(StartupError::DatabaseUnsupported)
        };

        stores
    }
}

/// Reasons the server refuses to start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[cfg(feature = "postgres")]
    #[error("Database connection failed: {0}")]
    Database(String),

    #[cfg(not(feature = "postgres"))]
    #[error("DATABASE_URL is set but the postgres feature is disabled")]
    DatabaseUnsupported,

    #[error(transparent)]
    Generator(#[from] GenerationError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PipelineOrchestrator>,
    pub scheduling: Arc<SchedulingEngine>,
    pub usage: Arc<UsageMeter>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub token_service: Arc<dyn TokenService>,
    /// `None` disables per-organization generation limits.
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build the application state from configuration.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let stores = Stores::connect(config).await?;
        let generator = Arc::new(OpenAiTextGenerator::new(config.openai.clone())?);
        let token_service = Arc::new(JwtTokenService::new(config.jwt.clone()));

        #[cfg(feature = "rate-limit")]
        let rate_limiter: Option<Arc<dyn RateLimiter>> = Some(Arc::new(
            cadence_infra::GenerationRateLimiter::new(config.rate_limit.clone()),
        ));
        #[cfg(not(feature = "rate-limit"))]
        let rate_limiter: Option<Arc<dyn RateLimiter>> = None;

        let state = Self::assemble(
            config,
            stores,
            generator,
            token_service,
            rate_limiter,
            Arc::new(SystemClock),
        );

        let policy = state.pipeline.policy();
        tracing::info!(
            default_count = policy.default_count(),
            max_count = policy.max_count(),
            "Application state initialized"
        );

        Ok(state)
    }

    /// Wire the services over the given adapters.
    pub fn assemble(
        config: &AppConfig,
        stores: Stores,
        generator: Arc<dyn TextGenerator>,
        token_service: Arc<dyn TokenService>,
        rate_limiter: Option<Arc<dyn RateLimiter>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let usage = Arc::new(UsageMeter::new(stores.usage, clock.clone()));
        let scheduling = Arc::new(SchedulingEngine::new(stores.posts.clone(), clock.clone()));
        let pipeline = Arc::new(PipelineOrchestrator::new(
            stores.profiles.clone(),
            stores.posts,
            ContentGenerator::new(generator),
            config.moderation(),
            usage.clone(),
            config.policy,
            clock.clone(),
        ));

        Self {
            pipeline,
            scheduling,
            usage,
            profiles: stores.profiles,
            token_service,
            rate_limiter,
            clock,
        }
    }
}
