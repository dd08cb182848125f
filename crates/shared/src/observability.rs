//! # トレーシング初期化
//!
//! `herald-dispatcher` はコマンドの結果（JSON）を標準出力に書くため、
//! ログはすべて標準エラー出力に流す。
//!
//! 出力形式は `LOG_FORMAT`（`json` / `pretty`）、レベルは `RUST_LOG` で切り替える。

use std::str::FromStr;

/// `RUST_LOG` 未設定時のフィルタ
pub const DEFAULT_DIRECTIVE: &str = "info,herald=debug";

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 1 イベント 1 行の JSON（ログ収集基盤向け）
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "" => Ok(Self::Pretty),
            other => Err(format!("未知のログ形式です: {other}")),
        }
    }
}

impl LogFormat {
    /// `LOG_FORMAT` を読む
    ///
    /// 解釈できない値は Pretty として扱う。サブスクライバ初期化前なので
    /// 警告は `eprintln!` で出す。
    pub fn from_env() -> Self {
        let Ok(raw) = std::env::var("LOG_FORMAT") else {
            return Self::default();
        };
        raw.parse().unwrap_or_else(|e| {
            eprintln!("LOG_FORMAT を無視します: {e}");
            Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub service_name:      String,
    pub log_format:        LogFormat,
    pub default_directive: String,
}

impl TracingConfig {
    pub fn new(service_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            service_name: service_name.into(),
            log_format,
            default_directive: DEFAULT_DIRECTIVE.to_owned(),
        }
    }

    pub fn from_env(service_name: impl Into<String>) -> Self {
        Self::new(service_name, LogFormat::from_env())
    }

    /// `RUST_LOG` 未設定時のフィルタを差し替える
    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }
}

/// グローバルサブスクライバを登録する
///
/// `ErrorLayer` も登録するので、`InfraError` の `SpanTrace` に生成時のスパンが残る。
#[cfg(feature = "observability")]
pub fn init_tracing(config: TracingConfig) {
    use tracing_subscriber::{EnvFilter, Layer as _, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_directive));

    let output = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let output = match config.log_format {
        LogFormat::Json => output
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Pretty => output.with_target(false).boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .with(tracing_error::ErrorLayer::default())
        .init();

    tracing::debug!(
        service = %config.service_name,
        format = ?config.log_format,
        "トレーシングを初期化しました"
    );
}
