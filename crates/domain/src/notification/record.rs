//! 通知レコード

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{DeliveryMethod, NotificationId, NotificationStatus};
use crate::user::UserId;

/// 通知レコードの一意キー
///
/// 配信サービスの ID・種別・解決済みの宛先ユーザーの組。
/// 宛先ユーザーが解決できなかった場合（`None`）同士も同一キーとして扱う。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotificationKey {
    pub code_name:         String,
    pub notification_type: String,
    pub target_id:         Option<UserId>,
}

/// 永続化された通知レコード
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationRecord {
    pub id:                NotificationId,
    pub title:             String,
    pub description:       String,
    pub read:              bool,
    pub timestamp:         DateTime<Utc>,
    pub edited_timestamp:  DateTime<Utc>,
    /// 宛先ユーザー（解決できなければ `None`）
    pub target_id:         Option<UserId>,
    /// 送信者ユーザー（解決できなければ `None`）
    pub user_id:           Option<UserId>,
    /// 配信サービス側の ID
    pub code_name:         String,
    /// 配信方法の大文字表記（`EMAIL`, `SMS` など）
    pub notification_type: String,
    /// 配信サービスのレスポンス JSON
    pub data:              Value,
    pub status:            NotificationStatus,
    pub metadata:          Map<String, Value>,
    pub created_at:        DateTime<Utc>,
    pub updated_at:        DateTime<Utc>,
}

impl NotificationRecord {
    /// 一意キーを返す
    pub fn key(&self) -> NotificationKey {
        NotificationKey {
            code_name:         self.code_name.clone(),
            notification_type: self.notification_type.clone(),
            target_id:         self.target_id.clone(),
        }
    }

    /// 種別を配信方法として解釈する（未知の種別は `None`）
    pub fn delivery_method(&self) -> Option<DeliveryMethod> {
        self.notification_type.parse().ok()
    }
}
