/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register
///     │   └── POST /login
///     └── /tasks/            # Authenticated; scoped to the current user
///         ├── GET    /
///         ├── POST   /
///         ├── GET    /:id
///         ├── PATCH  /:id
///         └── DELETE /:id
/// ```
///
/// The authenticator is injected as a trait object so tests can swap the
/// JWT implementation for the stub without touching any route code.

use crate::{config::Config, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use taskbox_shared::auth::authenticator::Authenticator;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Identity collaborator resolving the current principal
    pub authenticator: Arc<dyn Authenticator>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            authenticator,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskbox_api::app::{build_router, AppState};
/// use taskbox_api::config::Config;
/// use taskbox_shared::auth::authenticator::JwtAuthenticator;
/// use taskbox_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let authenticator = Arc::new(JwtAuthenticator::new(config.jwt.secret.clone()));
///
/// let app = build_router(AppState::new(pool, config, authenticator));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Task routes (authenticated; every handler works inside the current
    // user's collection)
    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::show_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::destroy_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_user,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Authentication middleware
///
/// Resolves the current principal through the configured authenticator and
/// injects it into request extensions. Requests that cannot be resolved are
/// rejected here; task handlers never observe an unauthenticated caller.
async fn require_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let principal = state.authenticator.authenticate(req.headers())?;
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
