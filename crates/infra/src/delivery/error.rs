//! 通知配信クライアントのエラー型

use thiserror::Error;

/// 通知配信クライアントエラー
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// 配信サービスが入力を拒否した（400）
    #[error("配信サービスが通知を拒否しました: {0}")]
    Rejected(String),

    /// ネットワークエラー
    #[error("ネットワークエラー: {0}")]
    Network(String),

    /// 予期しないステータス
    #[error("予期しないステータス {status}: {body}")]
    Unexpected { status: u16, body: String },

    /// 成功ステータスだがボディを解釈できない
    #[error("不正なレスポンス: {0}")]
    InvalidResponse(String),

    /// クライアントの構築に失敗
    #[error("クライアント設定エラー: {0}")]
    Configuration(String),
}

impl DeliveryError {
    /// 配信サービスによる拒否か
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Network(err.to_string())
    }
}
