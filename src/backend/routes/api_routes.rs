/**
 * API Route Handlers
 *
 * # Routes
 *
 * ## Cards
 * - `GET  /api/get-polaroid-by-slug` - Public card lookup
 * - `POST /api/get-polaroids` - Owner or community listing (also `GET`)
 * - `POST /api/delete-polaroid` - Owner-only delete
 *
 * ## Notifications
 * - `POST /api/notifications` - List and mark like notifications
 *
 * Every route here is wrapped by the CORS middleware, which also answers
 * `OPTIONS` preflights.
 */

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::backend::cards::{delete_card, get_card_by_slug, get_cards, get_cards_query};
use crate::backend::middleware::cors_middleware;
use crate::backend::notifications::list_notifications;
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// Returns `router` with the `/api` routes added and the CORS layer
/// applied to them.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/api/get-polaroid-by-slug", get(get_card_by_slug))
        .route("/api/get-polaroids", post(get_cards).get(get_cards_query))
        .route("/api/delete-polaroid", post(delete_card))
        .route("/api/notifications", post(list_notifications))
        .layer(middleware::from_fn(cors_middleware))
}
