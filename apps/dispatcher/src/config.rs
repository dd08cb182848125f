//! # Dispatcher 設定
//!
//! 環境変数から通知配信クライアントの設定を読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `DATABASE_URL` | **Yes** | PostgreSQL 接続 URL |
//! | `NOTIFICATION_SERVICE_HOST` | **Yes** | 配信サービスのベース URL |
//! | `NOTIFICATION_SERVICE_SECRET_KEY` | **Yes** | 配信サービスの Bearer トークン |
//! | `NOTIFICATION_DEFAULT_LOCALE` | No | 初期ロケール（デフォルト: `en`） |
//! | `NOTIFICATION_TEMPLATE_DIR` | No | 追加テンプレートのディレクトリ |

use std::{env, fmt, path::PathBuf};

use herald_domain::locale::Locale;
use thiserror::Error;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 値が不正
    #[error("{name} の値が不正です: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Dispatcher の設定
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// データベース接続 URL
    pub database_url:   String,
    /// 配信サービスの設定
    pub delivery:       DeliveryConfig,
    /// ロケールコンテキストの初期値
    pub default_locale: Locale,
    /// 追加テンプレートのディレクトリ
    pub template_dir:   Option<PathBuf>,
}

/// 配信サービスの接続設定
#[derive(Clone)]
pub struct DeliveryConfig {
    pub host:       String,
    pub secret_key: String,
}

impl fmt::Debug for DeliveryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryConfig")
            .field("host", &self.host)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

impl DispatcherConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let default_locale = lookup("NOTIFICATION_DEFAULT_LOCALE").unwrap_or_else(|| "en".to_string());
        let default_locale = Locale::new(default_locale).map_err(|e| ConfigError::Invalid {
            name:   "NOTIFICATION_DEFAULT_LOCALE",
            reason: e.to_string(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            delivery: DeliveryConfig {
                host:       required("NOTIFICATION_SERVICE_HOST")?,
                secret_key: required("NOTIFICATION_SERVICE_SECRET_KEY")?,
            },
            default_locale,
            template_dir: lookup("NOTIFICATION_TEMPLATE_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<DispatcherConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DispatcherConfig::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/herald"),
        ("NOTIFICATION_SERVICE_HOST", "https://notify.example.com/api"),
        ("NOTIFICATION_SERVICE_SECRET_KEY", "s3cret"),
    ];

    #[test]
    fn test_必須項目のみで既定値が補われる() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/herald");
        assert_eq!(config.delivery.host, "https://notify.example.com/api");
        assert_eq!(config.default_locale.as_str(), "en");
        assert_eq!(config.template_dir, None);
    }

    #[test]
    fn test_任意項目を読み込む() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("NOTIFICATION_DEFAULT_LOCALE", "fr"));
        vars.push(("NOTIFICATION_TEMPLATE_DIR", "/etc/herald/templates"));

        let config = load(&vars).unwrap();

        assert_eq!(config.default_locale.as_str(), "fr");
        assert_eq!(
            config.template_dir,
            Some(PathBuf::from("/etc/herald/templates"))
        );
    }

    #[test]
    fn test_必須項目がなければmissingを返す() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "NOTIFICATION_SERVICE_SECRET_KEY")
            .collect();

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(ConfigError::Missing("NOTIFICATION_SERVICE_SECRET_KEY"))
        ));
    }

    #[test]
    fn test_空白のみのロケールはinvalidを返す() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("NOTIFICATION_DEFAULT_LOCALE", "  "));

        let result = load(&vars);

        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                name: "NOTIFICATION_DEFAULT_LOCALE",
                ..
            })
        ));
    }

    #[test]
    fn test_debug出力でシークレットを隠す() {
        let config = load(&REQUIRED).unwrap();

        let debug = format!("{config:?}");

        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
