//! # Herald Dispatcher
//!
//! 通知ペイロードを組み立てて外部の配信サービスに送り、
//! 配信記録をローカルに保存する通知配信クライアント。
//!
//! ```text
//! NotificationRequest
//!   → ロケール切り替え → ペイロード組み立て → ロケール復元
//!   → 配信サービスへ POST
//!   → 宛先の逆引き → 通知レコードの upsert
//! ```

pub mod config;
pub mod error;
pub mod usecase;

pub use error::DispatcherError;
