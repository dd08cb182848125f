//! 配信レスポンス
//!
//! 配信サービスが返す通知オブジェクト。省略・null のフィールドは既定値で補い、
//! 元の JSON は通知レコードの `data` として保持する。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::request::stringify_value;

/// 配信サービスが返す 1 件分の通知
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DispatchResponse {
    /// 配信サービス側の ID（通知レコードの `code_name` になる）
    #[serde(default, deserialize_with = "lenient_string")]
    pub id:              String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub recipient:       String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sender:          String,
    #[serde(default = "default_delivery_method", deserialize_with = "lenient_string")]
    pub delivery_method: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message_subject: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message_body:    String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_read:         bool,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at:      Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub modified_at:     Option<DateTime<Utc>>,
    /// 受信した JSON そのもの
    #[serde(skip)]
    pub raw:             Value,
}

impl DispatchResponse {
    /// 受信した JSON から組み立て、元の JSON を `raw` に保持する
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let mut response: Self = serde_json::from_value(value.clone())?;
        response.raw = value;
        Ok(response)
    }

    /// 通知レコードの種別コード（配信方法の大文字表記）
    ///
    /// 配信方法が空の場合は `EMAIL` とみなす。
    pub fn type_code(&self) -> String {
        if self.delivery_method.is_empty() {
            return default_delivery_method().to_ascii_uppercase();
        }
        self.delivery_method.to_ascii_uppercase()
    }
}

/// 一括送信のレスポンス（`{"notifications": [...]}`）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDispatchResponse {
    pub notifications: Vec<DispatchResponse>,
}

impl BulkDispatchResponse {
    /// 受信した JSON から組み立てる
    ///
    /// `notifications` が存在しない場合は空として扱う。
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let notifications = match value {
            Value::Object(mut object) => match object.remove("notifications") {
                Some(Value::Array(items)) => items
                    .into_iter()
                    .map(DispatchResponse::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
                Some(Value::Null) | None => Vec::new(),
                Some(other) => {
                    return Err(serde::de::Error::custom(format!(
                        "notifications は配列である必要があります: {other}"
                    )));
                }
            },
            other => {
                return Err(serde::de::Error::custom(format!(
                    "一括送信レスポンスはオブジェクトである必要があります: {other}"
                )));
            }
        };
        Ok(Self { notifications })
    }
}

fn default_delivery_method() -> String {
    "email".to_string()
}

/// 文字列・数値・null を文字列として受け付ける
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(stringify_value(&value))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 またはタイムゾーンなしの ISO 8601（UTC とみなす）を受け付ける
///
/// 解釈できない値は `None` とし、永続化時に現在時刻で補完される。
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(raw) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    Ok(NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc()))
}
