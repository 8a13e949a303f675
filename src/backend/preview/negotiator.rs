/**
 * Content Negotiator
 *
 * Decides, per request on the share route `/c/{slug}`, whether the caller
 * gets a synthesized share preview or passes through to the app shell.
 *
 * # Decision
 *
 * 1. Path outside `/c/` - pass through
 * 2. User agent not a known link-unfurling crawler - pass through
 * 3. Empty or malformed slug - pass through
 * 4. One store lookup, bounded by the fetch timeout
 * 5. Card found - preview; timeout, store error or no card - pass through
 *
 * The negotiator never produces an error response of its own. Every
 * failure degrades to pass-through, and nothing is retried.
 */

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::backend::preview::agents::is_preview_agent;
use crate::backend::preview::document::PreviewDocument;
use crate::backend::preview::PreviewSettings;
use crate::backend::server::state::AppState;
use crate::backend::store::CardStore;
use crate::shared::card::validate_slug;

/// Path prefix of the share route
pub const SHARE_PREFIX: &str = "/c/";

/// Cache policy for synthesized previews
pub const PREVIEW_CACHE_CONTROL: &str = "public, max-age=3600";

const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Outcome of negotiating one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation {
    /// Hand the request to the next service unchanged
    PassThrough,
    /// Answer with this preview document
    Preview(PreviewDocument),
}

/// The parts of a request the negotiator looks at
#[derive(Debug, Clone, Copy)]
pub struct RequestFacts<'a> {
    pub path: &'a str,
    pub user_agent: Option<&'a str>,
    pub host: Option<&'a str>,
    pub forwarded_proto: Option<&'a str>,
}

impl<'a> RequestFacts<'a> {
    pub fn from_parts(path: &'a str, headers: &'a HeaderMap) -> Self {
        Self {
            path,
            user_agent: header_text(headers, header::USER_AGENT.as_str()),
            host: header_text(headers, header::HOST.as_str()),
            forwarded_proto: header_text(headers, FORWARDED_PROTO),
        }
    }
}

fn header_text<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// First path segment after `/c/`, if non-empty
pub fn slug_from_path(path: &str) -> Option<&str> {
    let rest = path.strip_prefix(SHARE_PREFIX)?;
    let slug = rest.split('/').next().unwrap_or_default();
    if slug.is_empty() {
        None
    } else {
        Some(slug)
    }
}

/// `{scheme}://{host}` for absolute preview URLs
pub fn request_origin(facts: &RequestFacts<'_>, settings: &PreviewSettings) -> String {
    let scheme = facts
        .forwarded_proto
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|s| *s == "http" || *s == "https")
        .unwrap_or(settings.public_scheme.as_str());
    let host = facts
        .host
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .unwrap_or(settings.public_host.as_str());
    format!("{}://{}", scheme, host)
}

/// Decide how to answer a request
pub async fn negotiate(
    store: &dyn CardStore,
    settings: &PreviewSettings,
    facts: &RequestFacts<'_>,
) -> Negotiation {
    if !facts.path.starts_with(SHARE_PREFIX) {
        return Negotiation::PassThrough;
    }
    if !is_preview_agent(facts.user_agent) {
        return Negotiation::PassThrough;
    }
    let Some(raw_slug) = slug_from_path(facts.path) else {
        return Negotiation::PassThrough;
    };
    let slug = match validate_slug(raw_slug) {
        Ok(slug) => slug,
        Err(e) => {
            tracing::debug!("[Preview] Ignoring malformed slug: {}", e);
            return Negotiation::PassThrough;
        }
    };

    let lookup = tokio::time::timeout(settings.fetch_timeout, store.card_by_slug(slug)).await;
    let card = match lookup {
        Ok(Ok(Some(card))) => card,
        Ok(Ok(None)) => {
            tracing::debug!("[Preview] No card for slug '{}'", slug);
            return Negotiation::PassThrough;
        }
        Ok(Err(e)) => {
            tracing::warn!("[Preview] Card lookup for '{}' failed: {}", slug, e);
            return Negotiation::PassThrough;
        }
        Err(_) => {
            tracing::warn!(
                "[Preview] Card lookup for '{}' timed out after {:?}",
                slug,
                settings.fetch_timeout
            );
            return Negotiation::PassThrough;
        }
    };

    let origin = request_origin(facts, settings);
    tracing::info!("[Preview] Serving share preview for '{}'", slug);
    Negotiation::Preview(PreviewDocument::for_card(&card, &origin, &settings.og_image_path))
}

/// Render a preview as an HTTP response
pub fn preview_response(document: &PreviewDocument) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, PREVIEW_CACHE_CONTROL),
        ],
        document.render(),
    )
        .into_response()
}

/// Router-wide middleware answering crawlers on the share route
pub async fn share_preview_gate(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !request.uri().path().starts_with(SHARE_PREFIX) {
        return next.run(request).await;
    }

    let path = request.uri().path().to_owned();
    let headers = request.headers().clone();
    let facts = RequestFacts::from_parts(&path, &headers);
    let decision = negotiate(state.cards.as_ref(), &state.preview, &facts).await;

    match decision {
        Negotiation::Preview(document) => preview_response(&document),
        Negotiation::PassThrough => next.run(request).await,
    }
}
