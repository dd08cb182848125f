//! # Dispatcher エラー定義

use herald_domain::notification::NotificationError;
use herald_infra::{InfraError, delivery::DeliveryError};
use thiserror::Error;

/// 通知ユースケースで発生するエラー
///
/// 配信サービスによる拒否（400）はエラーではなく
/// [`DispatchOutcome::Rejected`](crate::usecase::DispatchOutcome::Rejected) として返す。
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// テンプレートが見つからない、またはレンダリングに失敗
    #[error("テンプレートエラー: {0}")]
    Template(#[from] NotificationError),

    /// 配信サービスとの通信エラー
    #[error("配信エラー: {0}")]
    Delivery(#[from] DeliveryError),

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}
