//! 通知リクエスト
//!
//! 呼び出し元が組み立てる 1 件分の通知内容。JSON からもデシリアライズできる。
//! 件名・本文は任意の JSON 値を受け付け、送信時に文字列化する。

use serde::Deserialize;
use serde_json::{Map, Value};

use super::DeliveryMethod;

/// HTML テンプレートの指定
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlTemplate {
    /// テンプレートパス（拡張子なし、空なら `mail/global`）
    pub path:    String,
    /// テンプレートに渡す値
    pub payload: Map<String, Value>,
}

/// 本文テンプレートの指定
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageTemplate {
    /// プレーンテキスト本文
    pub text: String,
    /// HTML テンプレート
    pub html: HtmlTemplate,
}

/// 通知リクエスト
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotificationRequest {
    pub method:    DeliveryMethod,
    /// 宛先（メールアドレスまたは電話番号）。空の場合は送信しない
    pub recipient: String,
    /// 送信者。空の場合はペイロードに含めない
    pub sender:    String,
    pub subject:   Value,
    /// テンプレート指定がない場合に使う生の本文
    pub body:      Value,
    pub template:  MessageTemplate,
    /// 内部ユーザー宛ての通知か
    pub internal:  bool,
    /// 通知レコードに保存する任意のメタデータ
    pub metadata:  Map<String, Value>,
    /// true の場合、送信せずに組み立てたペイロードを返す
    pub dump:      bool,
}

impl NotificationRequest {
    pub fn new(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: DeliveryMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<Value>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.template.text = text.into();
        self
    }

    pub fn with_html(mut self, path: impl Into<String>, payload: Map<String, Value>) -> Self {
        self.template.html = HtmlTemplate {
            path: path.into(),
            payload,
        };
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    pub fn dump(mut self) -> Self {
        self.dump = true;
        self
    }

    /// 通知レコード用のメタデータを返す
    ///
    /// `title` と `description` は存在する場合のみ文字列化する。
    /// その他のキーはそのまま保持する。
    pub fn record_metadata(&self) -> Map<String, Value> {
        let mut metadata = self.metadata.clone();
        for key in ["title", "description"] {
            if let Some(value) = metadata.get_mut(key) {
                *value = Value::String(stringify_value(value));
            }
        }
        metadata
    }
}

/// JSON 値を文字列化する
///
/// - `null` → 空文字列
/// - 文字列 → そのまま
/// - その他 → JSON テキスト
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
