//! HTTP handlers and route configuration.

mod health;
mod posts;
mod profile;
mod usage;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Organization-scoped routes
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list))
                    .route("/generate", web::post().to(posts::generate))
                    .route("/publish-due", web::post().to(posts::publish_due))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}/schedule", web::post().to(posts::schedule)),
            )
            .route("/usage", web::get().to(usage::get))
            .service(
                web::resource("/profile")
                    .route(web::get().to(profile::get))
                    .route(web::put().to(profile::put))
                    .route(web::delete().to(profile::delete)),
            ),
    );
}
