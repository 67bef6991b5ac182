//! # codebox: course catalog, exercise progress and community API
//!
//! `codebox` is the backend for an interactive coding school. Learners browse a catalog of
//! courses, enroll, work through exercises in an in-browser editor, and earn XP for each exercise
//! they complete. A small community forum lets them post questions, share projects and reply to
//! each other under a public display profile.
//!
//! ## Architecture
//!
//! The service is built on [Axum](https://github.com/tokio-rs/axum) for the HTTP layer and uses
//! PostgreSQL (through SQLx) for all persistence. Schema migrations in `./migrations` run on
//! start-up.
//!
//! ### Request Flow
//!
//! Identity is established upstream: an authenticating proxy verifies the learner and forwards
//! their provider id and email as trusted headers. The [`auth::Identity`] extractor reads those
//! headers; handlers that need a learner take it as an argument, and handlers where identity only
//! enriches the response take `Option<Identity>`. A learner row is created lazily the first time
//! an identified request writes something.
//!
//! Each handler opens one transaction, builds the repositories it needs from [`db::handlers`] on
//! top of it, and commits once. Exercise completion relies on this: recording the completion,
//! crediting course XP and crediting the learner's points either all happen or none do, and the
//! unique completion row makes retries harmless.
//!
//! ### Core Components
//!
//! - [`api`]: HTTP handlers and request/response models, served under `/api`
//! - [`auth`]: proxy header identity extraction
//! - [`db`]: repositories and database models
//! - [`progress`]: achievement, badge and streak rules for learner statistics
//! - [`openapi`]: OpenAPI document, served at `/api-docs/openapi.json` and rendered at `/docs`
//! - [`config`]: YAML plus environment configuration via figment
//! - [`telemetry`]: tracing subscriber and optional OTLP export
//!
//! ## Getting Started
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/codebox cargo run -- -f config.yaml
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod progress;
pub mod telemetry;
#[cfg(test)]
pub mod test_utils;
pub mod types;

use crate::{config::CorsOrigin, openapi::ApiDoc};
use axum::{
    Json, Router,
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use bon::Builder;
pub use config::Config;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// Cloned into every handler by Axum; both fields are cheap to clone.
///
/// ```ignore
/// let state = AppState::builder().db(pool).config(config).build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
}

/// Get the codebox database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to PostgreSQL with the configured pool settings and bring the schema up to date.
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let settings = &config.database.pool;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect(&config.database.url)
        .await?;

    migrator().run(&pool).await?;
    Ok(pool)
}

/// Build the CORS layer from configuration.
///
/// A wildcard anywhere in the list allows any origin; otherwise origins are matched exactly.
/// Request headers are mirrored so the browser client can send the JSON content type.
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                // Origins never carry the trailing slash `Url` adds
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut exposed = Vec::new();
    for header in &cors_config.exposed_headers {
        exposed.push(header.parse::<HeaderName>()?);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors_config.allow_credentials)
        .expose_headers(exposed);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router with all endpoints and middleware.
///
/// - Learner API under `/api`
/// - Health check at `/healthz`
/// - OpenAPI JSON at `/api-docs/openapi.json`, Scalar UI at `/docs`
/// - Prometheus metrics at `/internal/metrics` when `enable_metrics` is set
///
/// # Errors
///
/// Returns an error if the CORS configuration cannot be turned into header values.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let api_routes = Router::new()
        // Catalog
        .route("/courses", get(api::handlers::courses::list_courses))
        .route("/courses/enrolled", get(api::handlers::courses::list_enrolled_courses))
        .route("/courses/{course_id}", get(api::handlers::courses::get_course_detail))
        // Learning
        .route("/enrollments", post(api::handlers::enrollments::enroll))
        .route("/exercise", post(api::handlers::exercises::get_exercise))
        .route("/exercise/complete", post(api::handlers::exercises::complete_exercise))
        // Learner account
        .route("/user", post(api::handlers::users::ensure_user))
        .route("/user/stats", get(api::handlers::users::get_user_stats))
        .route(
            "/user/profile",
            get(api::handlers::users::get_profile).put(api::handlers::users::update_profile),
        )
        // Community
        .route(
            "/community/posts",
            get(api::handlers::community::list_posts).post(api::handlers::community::create_post),
        )
        .route("/community/posts/{id}", get(api::handlers::community::get_post))
        .route("/community/replies", post(api::handlers::community::create_reply));

    let cors = create_cors_layer(&state.config)?;
    let enable_metrics = state.config.enable_metrics;

    let mut router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api", api_routes.with_state(state))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(cors);

    if enable_metrics {
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
        router = router
            .route(
                "/internal/metrics",
                get(move || {
                    let handle = metric_handle.clone();
                    async move { handle.render() }
                }),
            )
            .layer(prometheus_layer);
    }

    let router = router.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured server: database pool, state and router, ready to [`serve`](Application::serve).
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application, connecting to the configured database
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::new_with_pool(config, None).await
    }

    /// Create a new application, optionally reusing an existing pool.
    ///
    /// Migrations run against whichever pool ends up in use.
    pub async fn new_with_pool(config: Config, pool: Option<PgPool>) -> anyhow::Result<Self> {
        debug!("Starting codebox with configuration: {:#?}", config);

        let pool = match pool {
            Some(pool) => {
                migrator().run(&pool).await?;
                pool
            }
            None => setup_database(&config).await?,
        };

        let app_state = AppState::builder().db(pool.clone()).config(config.clone()).build();
        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.into_make_service()).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "codebox listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}
