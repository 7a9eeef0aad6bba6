//! # Cadence API Server
//!
//! The main entry point for the Actix-web HTTP server and the publish sweep.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    telemetry::init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting Cadence API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config)
        .await
        .map_err(std::io::Error::other)?;

    #[cfg(feature = "scheduler")]
    let mut sweep = {
        let sweep =
            background::SweepScheduler::new(config.scheduler.clone(), state.scheduling.clone())
                .await
                .map_err(std::io::Error::other)?;
        sweep.start().await.map_err(std::io::Error::other)?;
        sweep
    };
    #[cfg(not(feature = "scheduler"))]
    if config.scheduler.enabled {
        tracing::warn!("Built without the scheduler feature - publish sweep is not running");
    }

    let app_state = state.clone();
    let result = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await;

    #[cfg(feature = "scheduler")]
    if let Err(e) = sweep.shutdown().await {
        tracing::error!(error = %e, "Failed to stop publish sweep");
    }

    tracing::info!("Cadence API Server stopped");
    result
}
