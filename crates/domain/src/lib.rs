//! # Herald ドメイン層
//!
//! 通知配信クライアントのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋な型**: DB や HTTP には一切依存しない
//! - **値オブジェクト**: 生成時にバリデーションを実行する（Email, Locale など）
//! - **明示的なロケール**: プロセス全体の状態ではなく [`locale::LocaleContext`] を
//!   呼び出し元が所有して渡す
//!
//! ## 依存関係の方向
//!
//! ```text
//! dispatcher → infra → domain
//!      ↘         ↘
//!        shared ← ┘
//! ```
//!
//! ## モジュール構成
//!
//! - [`alert`] - アラート送信先アドレス
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメイン層エラー
//! - [`locale`] - ロケールとロケールコンテキスト
//! - [`notification`] - 通知ペイロード、配信レスポンス、通知レコード
//! - [`role`] - ロール名
//! - [`user`] - ユーザーディレクトリのエントリ

#[macro_use]
mod macros;

pub mod alert;
pub mod clock;
pub mod error;
pub mod locale;
pub mod notification;
pub mod role;
pub mod user;

pub use error::DomainError;
