//! Card API Client
//!
//! Async client for the card and notification services, plus the card
//! change stream consumed by the feed reconciler.

use std::time::Duration;

use futures_util::{Stream, StreamExt};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use uuid::Uuid;

use crate::client::config::Config;
use crate::client::sse::SseParser;
use crate::shared::api::{
    DataResponse, DeleteCardRequest, DeleteCardResult, ErrorResponse, FetchCardsRequest,
    NotificationsRequest, NotificationsResponse,
};
use crate::shared::{CardChange, CardRecord};

/// Path of the card change stream
pub const CARD_CHANGES_PATH: &str = "/realtime/cards";

const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// Errors returned by `ApiClient`
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Client for the devcard server
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Config,
    http: Client,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Public card lookup
    pub async fn fetch_by_slug(&self, slug: &str) -> Result<CardRecord, ClientError> {
        let request = self
            .http
            .get(self.config.api_url("/api/get-polaroid-by-slug"))
            .query(&[("slug", slug)]);
        self.send_data(request).await
    }

    /// Community feed, `limit` defaults to the server's page size
    pub async fn fetch_community(&self, limit: Option<usize>) -> Result<Vec<CardRecord>, ClientError> {
        let body = FetchCardsRequest {
            feed_type: Some("community".to_string()),
            limit: limit.map(|l| l as i64),
        };
        let request = self
            .http
            .post(self.config.api_url("/api/get-polaroids"))
            .json(&body);
        self.send_data(request).await
    }

    /// The caller's own cards, most recent first
    pub async fn fetch_mine(&self) -> Result<Vec<CardRecord>, ClientError> {
        let body = FetchCardsRequest {
            feed_type: Some("user".to_string()),
            limit: None,
        };
        let request = self
            .authorized(self.http.post(self.config.api_url("/api/get-polaroids")))?
            .json(&body);
        self.send_data(request).await
    }

    /// Delete one of the caller's cards
    pub async fn delete_card(&self, id: Uuid) -> Result<(), ClientError> {
        let body = DeleteCardRequest {
            id: Some(id.to_string()),
        };
        let request = self
            .authorized(self.http.post(self.config.api_url("/api/delete-polaroid")))?
            .json(&body);
        let result: DeleteCardResult = self.send_data(request).await?;
        if !result.success {
            return Err(ClientError::Decode("delete reported no success".to_string()));
        }
        Ok(())
    }

    /// The caller's notifications, optionally marking the returned ones read
    pub async fn notifications(
        &self,
        limit: Option<usize>,
        mark_as_read: bool,
    ) -> Result<NotificationsResponse, ClientError> {
        let body = NotificationsRequest {
            limit: limit.map(|l| l as i64),
            mark_as_read,
        };
        let request = self
            .authorized(self.http.post(self.config.api_url("/api/notifications")))?
            .json(&body);
        let response = request.send().await?;
        decode(response).await
    }

    /// Live card changes
    ///
    /// Reconnects with exponential backoff (1s doubling to 30s) whenever
    /// the connection drops. Reconnecting can replay or skip events; the
    /// feed merge is idempotent. The background task stops once the
    /// returned stream is dropped.
    pub fn card_changes(&self) -> impl Stream<Item = CardChange> + Send + Unpin + 'static {
        let (tx, rx) = mpsc::unbounded_channel();
        let http = self.http.clone();
        let url = self.config.api_url(CARD_CHANGES_PATH);
        tokio::spawn(run_change_stream(http, url, tx));
        UnboundedReceiverStream::new(rx)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let token = self.config.token().ok_or(ClientError::NotAuthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn send_data<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let envelope: DataResponse<T> = decode(response).await?;
        Ok(envelope.data)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorResponse>(&bytes)
            .map(|e| e.error)
            .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn run_change_stream(http: Client, url: String, tx: mpsc::UnboundedSender<CardChange>) {
    let mut reconnect_delay = INITIAL_RECONNECT_DELAY;

    while !tx.is_closed() {
        tracing::info!("[Feed] Subscribing to card changes: {}", url);
        let response = match http.get(&url).header("Accept", "text/event-stream").send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                tracing::warn!("[Feed] Subscription refused with {} (will retry)", resp.status());
                if !backoff(&tx, &mut reconnect_delay).await {
                    break;
                }
                continue;
            }
            Err(e) => {
                tracing::warn!("[Feed] Subscription failed (will retry): {}", e);
                if !backoff(&tx, &mut reconnect_delay).await {
                    break;
                }
                continue;
            }
        };

        reconnect_delay = INITIAL_RECONNECT_DELAY;
        let mut body = response.bytes_stream();
        let mut parser = SseParser::new();

        loop {
            let chunk = tokio::select! {
                _ = tx.closed() => return,
                chunk = body.next() => chunk,
            };
            let bytes = match chunk {
                Some(Ok(bytes)) => bytes,
                Some(Err(e)) => {
                    tracing::warn!("[Feed] Change stream error: {}", e);
                    break;
                }
                None => {
                    tracing::info!("[Feed] Change stream ended");
                    break;
                }
            };

            for event in parser.feed_bytes(&bytes) {
                match serde_json::from_str::<CardChange>(&event.data) {
                    Ok(change) => {
                        if tx.send(change).is_err() {
                            return;
                        }
                    }
                    Err(e) => tracing::warn!("[Feed] Undecodable change event: {}", e),
                }
            }
        }

        if !backoff(&tx, &mut reconnect_delay).await {
            break;
        }
    }
}

/// Sleep for the current delay and double it; false if the consumer left
async fn backoff(tx: &mpsc::UnboundedSender<CardChange>, delay: &mut Duration) -> bool {
    tokio::select! {
        _ = tx.closed() => return false,
        _ = tokio::time::sleep(*delay) => {}
    }
    *delay = std::cmp::min(*delay * 2, MAX_RECONNECT_DELAY);
    true
}
