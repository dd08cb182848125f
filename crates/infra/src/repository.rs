//! # リポジトリ実装
//!
//! 通知配信で参照・更新するテーブルへのアクセスを提供する。
//!
//! ## 設計方針
//!
//! - **トレイト境界**: ユースケース層はトレイト経由で利用し、テストではモックに差し替える
//! - **データベース抽象化**: sqlx を使用し、PostgreSQL 固有の処理をカプセル化
//! - **行とドメインの分離**: `FromRow` の行型で受け取り、ドメイン型へ変換する

pub mod alert_address_repository;
pub mod notification_repository;
pub mod user_directory;

pub use alert_address_repository::{AlertAddressRepository, PostgresAlertAddressRepository};
pub use notification_repository::{NotificationRepository, PostgresNotificationRepository};
pub use user_directory::{PostgresUserDirectory, UserDirectory};

use herald_domain::DomainError;

/// 外部で管理される列を読む
///
/// 空・空白のみ・ドメインの検証に通らない値は `None` にする。
/// 行ごと読めなくすると、1 件の不正な値で検索全体が失敗するため。
pub(crate) fn lenient<T>(
    value: Option<String>,
    field: &'static str,
    parse: impl FnOnce(String) -> Result<T, DomainError>,
) -> Option<T> {
    let value = value.filter(|v| !v.trim().is_empty())?;
    parse(value)
        .inspect_err(|e| tracing::debug!(field, error = %e, "値を未設定として扱います"))
        .ok()
}
