/**
 * Card Service Handlers
 *
 * # Routes
 *
 * - `GET  /api/get-polaroid-by-slug?slug=` - public card lookup
 * - `POST /api/get-polaroids` - `{type, limit?}`, also `GET` with query
 * - `POST /api/delete-polaroid` - `{id}`, owner only
 *
 * # Authorization
 *
 * Listing the caller's own cards and deleting require a bearer token. For
 * deletion the token is checked before the body is read; ownership is
 * checked against the stored record, never against anything the caller
 * sends.
 */

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::backend::cards::feed::{candidate_window, select_community};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::blob_path_from_url;
use crate::shared::api::{
    clamp_limit, DataResponse, DeleteCardRequest, DeleteCardResult, FeedType, FetchCardsRequest,
};
use crate::shared::card::validate_slug;
use crate::shared::CardRecord;

/// Decode a JSON request body, treating an empty body as `T::default()`
pub fn parse_json_body<T>(body: &Bytes) -> Result<T, BackendError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("[Cards] Rejected request body: {}", e);
        BackendError::invalid_input("Invalid JSON body")
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct SlugQuery {
    #[serde(default)]
    pub slug: Option<String>,
}

/// Fetch one card by slug (GET /api/get-polaroid-by-slug)
pub async fn get_card_by_slug(
    State(state): State<AppState>,
    query: Result<Query<SlugQuery>, QueryRejection>,
) -> Result<Json<DataResponse<CardRecord>>, BackendError> {
    let Query(query) = query?;
    let raw = query.slug.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(BackendError::invalid_input("Missing slug"));
    }
    // A slug no card could have is simply unknown
    let slug = validate_slug(&raw).map_err(|e| {
        tracing::debug!("[Cards] Slug lookup skipped: {}", e);
        BackendError::not_found("Polaroid not found")
    })?;

    let card = state
        .cards
        .card_by_slug(slug)
        .await?
        .ok_or_else(|| BackendError::not_found("Polaroid not found"))?;

    Ok(Json(DataResponse::new(card)))
}

/// List cards (POST /api/get-polaroids)
pub async fn get_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DataResponse<Vec<CardRecord>>>, BackendError> {
    let request: FetchCardsRequest = parse_json_body(&body)?;
    list_cards(&state, &headers, request).await.map(Json)
}

/// List cards (GET /api/get-polaroids?type=&limit=)
pub async fn get_cards_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<FetchCardsRequest>, QueryRejection>,
) -> Result<Json<DataResponse<Vec<CardRecord>>>, BackendError> {
    let Query(request) = query?;
    list_cards(&state, &headers, request).await.map(Json)
}

async fn list_cards(
    state: &AppState,
    headers: &HeaderMap,
    request: FetchCardsRequest,
) -> Result<DataResponse<Vec<CardRecord>>, BackendError> {
    let feed_type = FeedType::parse(request.feed_type.as_deref())?;

    let cards = match feed_type {
        FeedType::User => {
            let user = state.auth.authenticate(headers)?;
            let cards = state.cards.cards_by_owner(user.user_id).await?;
            tracing::debug!("[Cards] {} cards for owner {}", cards.len(), user.user_id);
            cards
        }
        FeedType::Community => {
            let limit = clamp_limit(request.limit);
            let candidates = state.cards.recent_image_cards(candidate_window(limit)).await?;
            let feed = select_community(candidates, limit, &mut rand::thread_rng());
            tracing::debug!("[Cards] Community feed of {} (limit {})", feed.len(), limit);
            feed
        }
    };

    Ok(DataResponse::new(cards))
}

/// Delete one of the caller's cards (POST /api/delete-polaroid)
///
/// The image is removed first, best effort; a blob failure is logged and
/// the record is still deleted.
pub async fn delete_card(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Bytes,
) -> Result<Json<DataResponse<DeleteCardResult>>, BackendError> {
    let request: DeleteCardRequest = parse_json_body(&body)?;
    let raw_id = request
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| BackendError::invalid_input("Missing polaroid id"))?;
    let id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| BackendError::invalid_input("Invalid polaroid id"))?;

    let card = state
        .cards
        .card_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("Polaroid not found"))?;

    if card.user_id != user.user_id {
        tracing::warn!(
            "[Cards] User {} attempted to delete card {} owned by {}",
            user.user_id,
            id,
            card.user_id
        );
        return Err(BackendError::forbidden("You do not own this polaroid"));
    }

    if let Some(url) = card.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
        match blob_path_from_url(url, &state.blob_bucket) {
            Some(path) => {
                if let Err(e) = state.blobs.delete(&path).await {
                    tracing::warn!("[Cards] Failed to delete image '{}' for {}: {}", path, id, e);
                }
            }
            None => tracing::warn!("[Cards] Image URL of {} is outside bucket: {}", id, url),
        }
    }

    let removed = state.cards.delete_card(id, user.user_id).await?;
    if removed == 0 {
        return Err(BackendError::not_found("Polaroid not found"));
    }

    tracing::info!("[Cards] Deleted card {} for {}", id, user.user_id);
    Ok(Json(DataResponse::new(DeleteCardResult { success: true })))
}
