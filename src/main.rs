//! PetLar Backend
//!
//! REST backend for the PetLar pet adoption site: session authentication,
//! a public pet catalog, and an admin console for pets and adoption records.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod validation;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PetLar Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if no admin account can ever be provisioned
    if config.admin_emails.is_empty() {
        tracing::warn!("No admin emails configured (PETLAR_ADMIN_EMAILS). The admin console is unreachable!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
        http: reqwest::Client::new(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes: catalog browsing, credential endpoints, chat proxy
    let public_routes = Router::new()
        .route("/auth/signup", post(api::signup))
        .route("/auth/login", post(api::login))
        .route("/pets", get(api::list_pets))
        .route("/pets/{id}", get(api::get_pet))
        .route("/pets/{id}/visit-link", get(api::get_visit_link))
        .route("/chat", post(api::chat));

    // Routes requiring a valid session
    let session_routes = Router::new()
        .route("/auth/logout", post(api::logout))
        .route("/auth/session", get(api::get_session))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_auth_layer,
        ));

    // Admin console: session + admin role
    let admin_routes = Router::new()
        .route("/pets", post(api::create_pet))
        .route("/pets/{id}/adopt", post(api::adopt_pet))
        .route("/pets/{id}/available", post(api::set_pet_available))
        .route("/adoptions", get(api::list_adoptions))
        .route("/webhook", get(api::get_webhook_config))
        .route("/webhook", put(api::update_webhook_config))
        .layer(middleware::from_fn(auth::require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::session_auth_layer,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(session_routes))
        .nest("/api/admin", admin_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
