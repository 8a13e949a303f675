/**
 * Notification Handlers
 *
 * `POST /api/notifications` with `{limit?, markAsRead?}`:
 *
 * 1. Fetch the caller's newest notifications, up to `limit`
 * 2. With `markAsRead`, set `read_at` on the fetched ones that are unread
 * 3. Count the caller's unread notifications with a separate query
 *
 * The page is returned as it was fetched, so the client can still tell
 * which entries were new. Notifications outside the page are never marked.
 */

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use uuid::Uuid;

use crate::backend::cards::handlers::parse_json_body;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::api::{clamp_limit, NotificationsRequest, NotificationsResponse};

/// List and optionally mark notifications (POST /api/notifications)
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Bytes,
) -> Result<Json<NotificationsResponse>, BackendError> {
    let request: NotificationsRequest = parse_json_body(&body)?;
    let limit = clamp_limit(request.limit);

    let notifications = state.cards.notifications_for(user.user_id, limit).await?;

    if request.mark_as_read {
        let unread: Vec<Uuid> = notifications
            .iter()
            .filter(|n| n.is_unread())
            .map(|n| n.id)
            .collect();
        if !unread.is_empty() {
            let marked = state.cards.mark_read(&unread, user.user_id, Utc::now()).await?;
            tracing::debug!("[Notifications] Marked {} read for {}", marked, user.user_id);
        }
    }

    let unread_count = state.cards.unread_count(user.user_id).await?;

    Ok(Json(NotificationsResponse {
        data: notifications,
        unread_count,
    }))
}
