/**
 * PostgreSQL Card Store
 *
 * `CardStore` implementation over a sqlx connection pool. Tables are created
 * by the migrations under `migrations/`:
 *
 * - `polaroids` - card records, profile stored as `jsonb`
 * - `like_notifications` - like notifications addressed to card owners
 *
 * Row changes on `polaroids` are published by a trigger with `pg_notify` on
 * the `polaroid_changes` channel as `{"type": "INSERT", "id": "..."}`.
 * NOTIFY payloads are limited to 8000 bytes, so the row itself is never
 * sent; `spawn_change_listener` loads it before relaying the change onto
 * the in-process broadcast.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::postgres::PgListener;
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{CardStore, StoreError};
use crate::backend::realtime::broadcast_change;
use crate::shared::{CardChange, CardRecord, LikeNotification, Profile};

/// Notification channel written by the `polaroids` change trigger
pub const CHANGE_CHANNEL: &str = "polaroid_changes";

/// Row shape of the `polaroids` table
#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: Uuid,
    slug: String,
    user_id: Uuid,
    profile: Json<Profile>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CardRow> for CardRecord {
    fn from(row: CardRow) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            user_id: row.user_id,
            profile: row.profile.0,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CARD_COLUMNS: &str = "id, slug, user_id, profile, image_url, created_at, updated_at";

/// Card store backed by PostgreSQL
#[derive(Clone)]
pub struct PgCardStore {
    pool: PgPool,
}

impl PgCardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CardStore for PgCardStore {
    async fn card_by_slug(&self, slug: &str) -> Result<Option<CardRecord>, StoreError> {
        let row = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM polaroids WHERE slug = $1",
            CARD_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CardRecord::from))
    }

    async fn card_by_id(&self, id: Uuid) -> Result<Option<CardRecord>, StoreError> {
        let row = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM polaroids WHERE id = $1",
            CARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CardRecord::from))
    }

    async fn cards_by_owner(&self, owner: Uuid) -> Result<Vec<CardRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM polaroids WHERE user_id = $1 ORDER BY created_at DESC",
            CARD_COLUMNS
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CardRecord::from).collect())
    }

    async fn recent_image_cards(&self, limit: usize) -> Result<Vec<CardRecord>, StoreError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            r#"
            SELECT {}
            FROM polaroids
            WHERE image_url IS NOT NULL
            ORDER BY created_at DESC
            LIMIT $1
            "#,
            CARD_COLUMNS
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CardRecord::from).collect())
    }

    async fn delete_card(&self, id: Uuid, owner: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM polaroids WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn notifications_for(
        &self,
        recipient: Uuid,
        limit: usize,
    ) -> Result<Vec<LikeNotification>, StoreError> {
        let rows = sqlx::query_as::<_, LikeNotification>(
            r#"
            SELECT id, polaroid_id, user_id, liker_name, liker_avatar, created_at, read_at
            FROM like_notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(recipient)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn unread_count(&self, recipient: Uuid) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM like_notifications WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(recipient)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn mark_read(
        &self,
        ids: &[Uuid],
        recipient: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            UPDATE like_notifications
            SET read_at = $1
            WHERE id = ANY($2) AND user_id = $3 AND read_at IS NULL
            "#,
        )
        .bind(at)
        .bind(ids)
        .bind(recipient)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// Payload published by the `polaroids` change trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ChangeNotice {
    #[serde(rename = "type")]
    pub op: ChangeOp,
    pub id: Uuid,
}

/// Turn a change notice into a full change event
///
/// Returns `None` when an inserted or updated row is already gone; its
/// delete notice follows on the same channel.
pub async fn resolve_notice(
    store: &dyn CardStore,
    notice: ChangeNotice,
) -> Result<Option<CardChange>, StoreError> {
    if notice.op == ChangeOp::Delete {
        return Ok(Some(CardChange::delete(notice.id)));
    }

    let Some(record) = store.card_by_id(notice.id).await? else {
        return Ok(None);
    };
    Ok(Some(match notice.op {
        ChangeOp::Insert => CardChange::insert(record),
        _ => CardChange::update(record),
    }))
}

/// Relay `polaroid_changes` notifications onto `changes`
///
/// Payloads that fail to decode are logged and skipped. `PgListener`
/// reconnects on its own after connection loss; the task runs until it is
/// aborted or the initial LISTEN fails.
pub fn spawn_change_listener(
    pool: PgPool,
    changes: broadcast::Sender<CardChange>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let store = PgCardStore::new(pool.clone());
        let mut listener = match PgListener::connect_with(&pool).await {
            Ok(listener) => listener,
            Err(e) => {
                tracing::error!("[Realtime] Failed to connect change listener: {:?}", e);
                return;
            }
        };

        if let Err(e) = listener.listen(CHANGE_CHANNEL).await {
            tracing::error!("[Realtime] Failed to LISTEN on {}: {:?}", CHANGE_CHANNEL, e);
            return;
        }
        tracing::info!("[Realtime] Listening for card changes on {}", CHANGE_CHANNEL);

        loop {
            match listener.recv().await {
                Ok(notification) => {
                    let notice = match serde_json::from_str::<ChangeNotice>(notification.payload())
                    {
                        Ok(notice) => notice,
                        Err(e) => {
                            tracing::warn!("[Realtime] Undecodable change payload: {}", e);
                            continue;
                        }
                    };
                    match resolve_notice(&store, notice).await {
                        Ok(Some(change)) => {
                            tracing::debug!(
                                "[Realtime] {} for card {}",
                                change.kind(),
                                change.card_id()
                            );
                            broadcast_change(&changes, change);
                        }
                        Ok(None) => {
                            tracing::debug!("[Realtime] Card {} gone before load", notice.id);
                        }
                        Err(e) => {
                            tracing::warn!("[Realtime] Failed to load card {}: {}", notice.id, e);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("[Realtime] Change listener error: {:?}", e);
                    tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                }
            }
        }
    })
}
