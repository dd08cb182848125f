//! # PostgreSQL 接続
//!
//! 通知レコードとユーザー・アラート宛先の参照に使う接続プールを作る。
//! スキーマは `migrations/` のファイルをバイナリに埋め込んで適用する。

use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

/// 接続プールの設定
///
/// `herald-dispatcher` は 1 回の起動で 1 リクエストしか処理しないため、既定値は小さい。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 4,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// 接続プールを作成する
///
/// 接続できない場合は `acquire_timeout` 経過後にエラーを返す。
#[tracing::instrument(skip_all, level = "debug", fields(max_connections = settings.max_connections))]
pub async fn create_pool(database_url: &str, settings: PoolSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await
}

/// 未適用のマイグレーションを適用する
///
/// sqlx が advisory lock を取るので、複数プロセスが同時に起動しても二重適用にはならない。
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
