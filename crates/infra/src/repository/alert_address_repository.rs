//! # AlertAddressRepository
//!
//! 運用アラートの送信先アドレスを取得する。

use async_trait::async_trait;
use herald_domain::{
    alert::{AlertAddress, AlertAddressId},
    user::Email,
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::lenient;
use crate::error::InfraError;

/// アラート送信先アドレスリポジトリトレイト
#[async_trait]
pub trait AlertAddressRepository: Send + Sync {
    /// すべての送信先アドレスを登録順に取得
    ///
    /// ユーザーに紐付くアドレスはユーザーのメールアドレスも併せて返す。
    async fn find_all(&self) -> Result<Vec<AlertAddress>, InfraError>;
}

#[derive(Debug, FromRow)]
struct AlertAddressRow {
    id:         Uuid,
    email:      Option<String>,
    user_email: Option<String>,
}

/// 紐付くユーザーのメールアドレスが空なら、アドレス自身のメールアドレスに戻る
impl From<AlertAddressRow> for AlertAddress {
    fn from(row: AlertAddressRow) -> Self {
        AlertAddress::new(
            AlertAddressId::from_uuid(row.id),
            lenient(row.email, "email", Email::new),
            lenient(row.user_email, "user_email", Email::new),
        )
    }
}

/// PostgreSQL 実装の AlertAddressRepository
#[derive(Debug, Clone)]
pub struct PostgresAlertAddressRepository {
    pool: PgPool,
}

impl PostgresAlertAddressRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertAddressRepository for PostgresAlertAddressRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<AlertAddress>, InfraError> {
        let rows = sqlx::query_as::<_, AlertAddressRow>(
            r#"
            SELECT a.id, a.email, u.email AS user_email
            FROM alert_addresses a
            LEFT JOIN users u ON u.id = a.user_id
            ORDER BY a.created_at, a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AlertAddress::from).collect())
    }
}
