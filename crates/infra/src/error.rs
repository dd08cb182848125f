//! # インフラ層エラー
//!
//! PostgreSQL とのやり取りで起きる失敗を [`InfraError`] にまとめる。
//! 配信サービスとの HTTP 通信の失敗は [`crate::delivery::DeliveryError`] が扱う。
//!
//! [`InfraError`] は種別（[`InfraErrorKind`]）と生成時点の [`SpanTrace`] を持つ。
//! どの upsert・検索で失敗したかは、ログに出した `SpanTrace` から辿る。

use std::fmt;

use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// クエリ実行や接続の失敗
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// 保存済みの行がドメインの制約を満たさない
    #[error("不正な保存データ: {0}")]
    CorruptRow(String),
}

impl InfraError {
    fn new(kind: InfraErrorKind) -> Self {
        Self {
            kind,
            span_trace: SpanTrace::capture(),
        }
    }

    pub fn corrupt_row(reason: impl Into<String>) -> Self {
        Self::new(InfraErrorKind::CorruptRow(reason.into()))
    }

    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }
}

impl fmt::Display for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self::new(InfraErrorKind::Database(source))
    }
}
