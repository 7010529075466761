//! Read-only inspection endpoint.
//!
//! # Routes
//! - `GET /admin/status`: namer variant and last refresh report
//! - `GET /admin/routes`: every cached routing rule
//! - `GET /admin/resolve/{task_queue}?attr=value`: name the active namer
//!   produces with the query parameters as routing context
//!
//! There is no mutation surface; rules change only through property sources.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::namer::TaskQueueNamer;
use crate::routing::PropertyRouteRepository;

/// State shared by the inspection handlers.
#[derive(Clone)]
pub struct AdminState {
    pub repository: Arc<PropertyRouteRepository>,
    pub namer: Arc<dyn TaskQueueNamer>,
    pub api_key: Option<Arc<str>>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/routes", get(get_routes))
        .route("/admin/resolve/{task_queue}", get(resolve_task_queue))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the inspection endpoint until shutdown.
pub async fn serve(
    listener: TcpListener,
    state: AdminState,
    mut shutdown: broadcast::Receiver<()>,
) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "Inspection endpoint listening");

    axum::serve(listener, setup_admin_router(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
        })
        .await?;

    tracing::info!("Inspection endpoint stopped");
    Ok(())
}
