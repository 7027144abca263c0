//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{require_auth, AuthGate};
use crate::config::Config;
use crate::error::Result;
use crate::store;

use super::routes;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub gate: AuthGate,
}

pub type SharedState = Arc<AppState>;

/// Validate config, open storage and wire up the gate
pub async fn build_state(config: Config) -> Result<SharedState> {
    config.validate()?;

    let backend = store::connect(&config.database).await?;
    backend.migrate().await?;

    let gate = AuthGate::from_config(&config.auth, backend.credentials(), backend.ledger())?;

    Ok(Arc::new(AppState { config, gate }))
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = build_state(config).await?;

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/profile", get(routes::profile))
        .route_layer(middleware::from_fn_with_state(
            state.gate.clone(),
            require_auth,
        ));

    let user_routes = Router::new()
        .route("/register", post(routes::register))
        .route("/login", post(routes::login))
        .route("/logout", get(routes::logout))
        .merge(protected);

    Router::new()
        .route("/", get(routes::index))
        .route("/api/health", get(routes::health))
        .nest("/api/user", user_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
