//! # 通知
//!
//! 通知配信パイプラインのドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 役割 |
//! |---|------------|------|
//! | [`NotificationRequest`] | 通知リクエスト | 呼び出し元が組み立てる 1 件分の通知内容 |
//! | [`WirePayload`] | 送信ペイロード | 配信サービスに POST する JSON ボディ |
//! | [`DispatchResponse`] | 配信レスポンス | 配信サービスが返す登録済み通知 |
//! | [`NotificationRecord`] | 通知レコード | ローカルに永続化される配信記録 |
//!
//! ## 設計方針
//!
//! - **ワイヤ形式とドメインの分離**: 配信方法はワイヤ上では小文字（`email`）、
//!   レコードの種別では大文字（`EMAIL`）で表現する
//! - **寛容なレスポンス解釈**: 配信サービスが省略・null を返したフィールドは既定値で補う
//! - **一意性**: 通知レコードは `(code_name, notification_type, target_id)` で一意

mod payload;
mod record;
mod request;
mod response;

pub use payload::{BulkPayload, WirePayload};
pub use record::{NotificationKey, NotificationRecord};
pub use request::{HtmlTemplate, MessageTemplate, NotificationRequest, stringify_value};
use serde::{Deserialize, Serialize};
pub use response::{BulkDispatchResponse, DispatchResponse};
use strum::IntoStaticStr;
use thiserror::Error;

define_uuid_id! {
    /// 通知レコード ID（一意識別子）
    ///
    /// notifications テーブルの主キー。UUID v7 を使用。
    pub struct NotificationId;
}

/// 通知の組み立てに関するエラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// テンプレートが登録されていない
    #[error("テンプレートが見つかりません: {0}")]
    TemplateNotFound(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 配信方法
///
/// ワイヤ上では小文字（`email`）。
/// 文字列からの変換は大文字小文字を区別しない。
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DeliveryMethod {
    #[default]
    Email,
    Sms,
    Push,
    Internal,
}

impl DeliveryMethod {
    /// ワイヤ形式（小文字）
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// ユーザーディレクトリで宛先を逆引きできる配信方法か
    ///
    /// メールはメールアドレス、SMS は電話番号で逆引きする。
    /// プッシュ・内部通知は対応するユーザー属性を持たない。
    pub fn is_resolvable(&self) -> bool {
        matches!(self, Self::Email | Self::Sms)
    }
}

/// 通知レコードのステータス
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    IntoStaticStr,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    /// 配信待ち
    Pending,
    /// 配信サービスに登録済み
    #[default]
    Notified,
    /// 受信者が既読にした
    Read,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}
