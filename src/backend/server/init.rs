/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, store selection and route configuration.
 *
 * # Initialization Process
 *
 * 1. Create the card change broadcast channel
 * 2. Pick the card store (PostgreSQL if reachable, otherwise in-memory)
 * 3. Create the local blob store under `BLOB_DIR/BLOB_BUCKET`
 * 4. Build `AppState` and the router
 */

use std::sync::Arc;

use axum::Router;

use crate::backend::auth::AuthGate;
use crate::backend::realtime::card_change_channel;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_card_store, ServerConfig};
use crate::backend::server::state::AppState;
use crate::backend::store::LocalBlobStore;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient:
/// - Missing database: the in-memory card store is used
/// - Migration failures: logged but don't prevent startup
pub async fn create_app(config: &ServerConfig) -> Router<()> {
    tracing::info!("Initializing devcard backend server");

    let card_changes = card_change_channel();
    let cards = load_card_store(config, &card_changes).await;
    let blobs = Arc::new(LocalBlobStore::for_bucket(
        &config.blob_dir,
        &config.blob_bucket,
    ));
    let auth = AuthGate::new(config.jwt_secret.clone(), config.jwt_audience.clone());

    let app_state = AppState::new(cards, blobs, auth, card_changes).configured(config);

    if let Some(dir) = &config.shell_dir {
        tracing::info!("Serving app shell from {}", dir.display());
    } else {
        tracing::info!("No SHELL_DIR configured, share route answers humans with an empty page");
    }

    let app = create_router(app_state, Some(config.blob_dir.as_path()));
    tracing::info!("Router configured");
    app
}
