//! # ユースケース層
//!
//! 通知配信のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと配信クライアントを `Arc<dyn Trait>` で外部から注入
//! - **時刻の注入**: 現在時刻は [`Clock`](herald_domain::clock::Clock) 経由で取得する

pub mod notification;

pub use notification::{AlertFanOut, BulkOutcome, DispatchOutcome, NotificationService};
