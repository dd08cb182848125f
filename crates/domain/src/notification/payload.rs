//! 送信ペイロード

use serde::{Deserialize, Serialize};

use super::DeliveryMethod;

/// 配信サービスに POST する 1 件分のペイロード
///
/// `sender` は空の場合フィールドごと省略する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WirePayload {
    pub is_internal_recipient: bool,
    pub recipient:             String,
    pub delivery_method:       DeliveryMethod,
    pub message_subject:       String,
    pub message_body:          String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender:                Option<String>,
}

impl WirePayload {
    /// 宛先が設定されているか
    pub fn has_recipient(&self) -> bool {
        !self.recipient.is_empty()
    }
}

/// 一括送信のリクエストボディ（`{"notifications": [...]}`）
#[derive(Debug, Serialize)]
pub struct BulkPayload<'a> {
    pub notifications: &'a [WirePayload],
}
