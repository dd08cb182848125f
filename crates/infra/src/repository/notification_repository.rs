//! # NotificationRepository
//!
//! 配信済み通知のレコードを永続化する。
//!
//! ## 設計方針
//!
//! - **一意キー**: `(code_name, notification_type, target_id)`。`target_id` が NULL
//!   同士も同一とみなす（`UNIQUE NULLS NOT DISTINCT`）
//! - **単一文の upsert**: `INSERT ... ON CONFLICT ... DO UPDATE` で、同じキーへの
//!   並行書き込みも 1 行に収束させる。アプリケーション側のロックは使わない
//! - **初回の値を保持**: 競合時も `id` と `created_at` は最初の挿入時の値のまま

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use herald_domain::{
    notification::{NotificationId, NotificationKey, NotificationRecord, NotificationStatus},
    user::UserId,
};
use serde_json::{Map, Value};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::InfraError;

/// 通知レコードリポジトリトレイト
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// 通知レコードを挿入または更新し、保存後のレコードを返す
    ///
    /// 同じキーのレコードが既に存在する場合は可変フィールドを上書きする。
    async fn upsert(&self, record: &NotificationRecord) -> Result<NotificationRecord, InfraError>;

    /// 一意キーで通知レコードを検索
    async fn find_by_key(
        &self,
        key: &NotificationKey,
    ) -> Result<Option<NotificationRecord>, InfraError>;
}

#[derive(Debug, FromRow)]
struct NotificationRow {
    id:                Uuid,
    title:             String,
    description:       String,
    is_read:           bool,
    notified_at:       DateTime<Utc>,
    edited_at:         DateTime<Utc>,
    target_id:         Option<Uuid>,
    user_id:           Option<Uuid>,
    code_name:         String,
    notification_type: String,
    data:              Value,
    status:            String,
    metadata:          Value,
    created_at:        DateTime<Utc>,
    updated_at:        DateTime<Utc>,
}

impl TryFrom<NotificationRow> for NotificationRecord {
    type Error = InfraError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let status = NotificationStatus::from_str(&row.status)
            .map_err(|e| InfraError::corrupt_row(format!("不正なステータス {}: {e}", row.status)))?;
        let metadata = match row.metadata {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Ok(NotificationRecord {
            id: NotificationId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            read: row.is_read,
            timestamp: row.notified_at,
            edited_timestamp: row.edited_at,
            target_id: row.target_id.map(UserId::from_uuid),
            user_id: row.user_id.map(UserId::from_uuid),
            code_name: row.code_name,
            notification_type: row.notification_type,
            data: row.data,
            status,
            metadata,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL 実装の NotificationRepository
#[derive(Debug, Clone)]
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(code_name = %record.code_name, notification_type = %record.notification_type)
    )]
    async fn upsert(&self, record: &NotificationRecord) -> Result<NotificationRecord, InfraError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (
                id, title, description, is_read, notified_at, edited_at,
                target_id, user_id, code_name, notification_type,
                data, status, metadata, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT ON CONSTRAINT notifications_identity_key DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                is_read = EXCLUDED.is_read,
                notified_at = EXCLUDED.notified_at,
                edited_at = EXCLUDED.edited_at,
                user_id = EXCLUDED.user_id,
                data = EXCLUDED.data,
                status = EXCLUDED.status,
                metadata = EXCLUDED.metadata,
                updated_at = EXCLUDED.updated_at
            RETURNING
                id, title, description, is_read, notified_at, edited_at,
                target_id, user_id, code_name, notification_type,
                data, status, metadata, created_at, updated_at
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.title)
        .bind(&record.description)
        .bind(record.read)
        .bind(record.timestamp)
        .bind(record.edited_timestamp)
        .bind(record.target_id.as_ref().map(|id| *id.as_uuid()))
        .bind(record.user_id.as_ref().map(|id| *id.as_uuid()))
        .bind(&record.code_name)
        .bind(&record.notification_type)
        .bind(&record.data)
        .bind(record.status.as_str())
        .bind(Value::Object(record.metadata.clone()))
        .bind(record.created_at)
        .bind(record.updated_at)
        .fetch_one(&self.pool)
        .await?;

        NotificationRecord::try_from(row)
    }

    #[tracing::instrument(skip_all, level = "debug", fields(code_name = %key.code_name))]
    async fn find_by_key(
        &self,
        key: &NotificationKey,
    ) -> Result<Option<NotificationRecord>, InfraError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT
                id, title, description, is_read, notified_at, edited_at,
                target_id, user_id, code_name, notification_type,
                data, status, metadata, created_at, updated_at
            FROM notifications
            WHERE code_name = $1
              AND notification_type = $2
              AND target_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(&key.code_name)
        .bind(&key.notification_type)
        .bind(key.target_id.as_ref().map(|id| *id.as_uuid()))
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(Some(NotificationRecord::try_from(row)?))
    }
}
