use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{access_codes, badges, health, verification};
use crate::services::{BadgeRenderer, BrandingResolver, FontResolver};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
    pub fonts: FontResolver,
}

impl AppState {
    /// Builds the badge renderer over this state's pool and resolvers.
    pub fn badge_renderer(&self) -> BadgeRenderer {
        let branding = BrandingResolver::new(
            self.pool.clone(),
            self.config.uploads.clone(),
            self.http.clone(),
        );
        BadgeRenderer::new(
            self.pool.clone(),
            branding,
            self.fonts.clone(),
            self.config.rendering.clone(),
        )
    }
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // One HTTP client for every remote font/asset fetch; the timeout makes
    // an unreachable source equivalent to a missing one.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(config.rendering.fetch_timeout_ms))
        .build()
        .unwrap_or_default();

    let fonts = FontResolver::new(config.fonts.clone(), http.clone());

    let state = AppState {
        pool,
        config: config.clone(),
        http,
        fonts,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Badge pipeline routes (v1)
    let api_routes = Router::new()
        .route("/api/v1/attendees/:attendee_id/badge", get(badges::get_badge))
        .route("/api/v1/attendees/:attendee_id/qr", get(badges::get_qr))
        .route(
            "/api/v1/exhibitions/:exhibition_id/badges",
            get(badges::get_badge_archive),
        )
        .route("/api/v1/verify", post(verification::verify_code))
        .route(
            "/api/v1/exhibitions/:exhibition_id/access-codes/backfill",
            post(access_codes::backfill_access_codes),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(trace_id))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
