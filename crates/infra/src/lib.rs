//! # Herald インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プール管理とマイグレーション
//! - **リポジトリ実装**: ユーザーディレクトリ、アラート送信先、通知レコードの永続化
//! - **外部 API クライアント**: 通知配信サービスへの HTTP 送信
//!
//! ## 依存関係
//!
//! ```text
//! dispatcher → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`delivery`] - 通知配信サービスクライアント
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use herald_infra::{db, delivery::HttpDeliveryClient};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("postgres://localhost/herald", db::PoolSettings::default()).await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let client = HttpDeliveryClient::new("https://notify.example.com/api", "secret")?;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod delivery;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
