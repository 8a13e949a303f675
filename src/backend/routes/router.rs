/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (cards, notifications) with CORS
 * 2. Card change stream (`/realtime/cards`)
 * 3. App shell on the share route (`/c/...`)
 * 4. Blob files (`/storage`)
 * 5. Fallback handler (404)
 *
 * The share-preview gate is layered over all of it, so crawlers on `/c/`
 * are answered before the app shell handler runs.
 */

use std::path::Path;

use axum::{
    extract::State,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use crate::backend::error::BackendError;
use crate::backend::preview::share_preview_gate;
use crate::backend::realtime::handle_card_subscription;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::{AppState, ShellSettings};

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state
/// * `storage_dir` - Directory served under `/storage`, if any
pub fn create_router(app_state: AppState, storage_dir: Option<&Path>) -> Router<()> {
    let router = configure_api_routes(Router::new());

    let router = router
        .route("/realtime/cards", get(handle_card_subscription))
        .route("/c/", get(app_shell))
        .route("/c/{*rest}", get(app_shell));

    let router = match storage_dir {
        Some(dir) => router.nest_service("/storage", ServeDir::new(dir)),
        None => router,
    };

    router
        .fallback(|| async { BackendError::not_found("Not found") })
        .layer(middleware::from_fn_with_state(app_state.clone(), share_preview_gate))
        .with_state(app_state)
}

/// Serve the interactive app shell
///
/// Without a configured shell, or if it cannot be read, the answer is an
/// empty 200 so share links never error for humans.
pub async fn app_shell(State(shell): State<ShellSettings>) -> Response {
    let Some(index) = shell.index_path() else {
        return Html(String::new()).into_response();
    };
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!("Failed to read app shell {}: {}", index.display(), e);
            Html(String::new()).into_response()
        }
    }
}
