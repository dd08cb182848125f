//! # 通知配信サービスクライアント
//!
//! 外部の通知配信サービスに通知を POST する。
//!
//! ## エンドポイント
//!
//! | 操作 | パス |
//! |------|------|
//! | 単発送信 | `POST {host}/notification/waiting/` |
//! | 一括送信 | `POST {host}/notification/waiting/bulk/` |
//!
//! 認証は `Authorization: Bearer <secret>` ヘッダーで行い、
//! クライアント生成時にデフォルトヘッダーとして一度だけ設定する。

mod client;
mod error;
mod response;

use async_trait::async_trait;
pub use client::HttpDeliveryClient;
pub use error::DeliveryError;
use herald_domain::notification::{BulkDispatchResponse, DispatchResponse, WirePayload};

/// 通知配信クライアントトレイト
///
/// テスト時には `mock::MockDeliveryClient` に差し替える。
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    /// 1 件の通知を送信する
    async fn send(&self, payload: &WirePayload) -> Result<DispatchResponse, DeliveryError>;

    /// 複数の通知を 1 リクエストで送信する
    ///
    /// リクエストボディは `{"notifications": [...]}`。
    async fn send_bulk(
        &self,
        payloads: &[WirePayload],
    ) -> Result<BulkDispatchResponse, DeliveryError>;
}
