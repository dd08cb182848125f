//! # 通知レコードの永続化
//!
//! 配信レスポンスを通知レコードに変換し、一意キーで upsert する。
//!
//! | レコード | 配信レスポンス |
//! |---------|--------------|
//! | `title` / `description` | `message_subject` / `message_body` |
//! | `read` | `is_read` |
//! | `timestamp` / `edited_timestamp` | `created_at` / `modified_at`（なければ現在時刻） |
//! | `target_id` / `user_id` | `recipient` / `sender` を逆引き |
//! | `code_name` | `id` |
//! | `notification_type` | `delivery_method` の大文字表記 |
//! | `data` | レスポンス JSON そのもの |

use std::sync::Arc;

use herald_domain::{
    clock::Clock,
    notification::{
        DispatchResponse,
        NotificationId,
        NotificationRecord,
        NotificationStatus,
    },
};
use herald_infra::{InfraError, repository::NotificationRepository};
use serde_json::{Map, Value};

use super::recipient::RecipientResolver;

/// 通知レコードの永続化を担当する
pub struct NotificationPersister {
    resolver:   RecipientResolver,
    repository: Arc<dyn NotificationRepository>,
    clock:      Arc<dyn Clock>,
}

impl NotificationPersister {
    pub fn new(
        resolver: RecipientResolver,
        repository: Arc<dyn NotificationRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resolver,
            repository,
            clock,
        }
    }

    /// 配信レスポンスを通知レコードとして保存する
    ///
    /// 同じ `(code_name, notification_type, target_id)` のレコードがあれば更新する。
    pub async fn persist(
        &self,
        response: &DispatchResponse,
        metadata: Map<String, Value>,
    ) -> Result<NotificationRecord, InfraError> {
        let notification_type = response.type_code();
        let target_id = self
            .resolver
            .resolve_user(&notification_type, &response.recipient)
            .await?;
        let user_id = self
            .resolver
            .resolve_user(&notification_type, &response.sender)
            .await?;
        let now = self.clock.now();

        let record = NotificationRecord {
            id: NotificationId::new(),
            title: response.message_subject.clone(),
            description: response.message_body.clone(),
            read: response.is_read,
            timestamp: response.created_at.unwrap_or(now),
            edited_timestamp: response.modified_at.unwrap_or(now),
            target_id,
            user_id,
            code_name: response.id.clone(),
            notification_type,
            data: response.raw.clone(),
            status: NotificationStatus::Notified,
            metadata,
            created_at: now,
            updated_at: now,
        };

        self.repository.upsert(&record).await
    }
}
