//! # 通知サービス
//!
//! ロケール切り替え → ペイロード組み立て → 配信 → 永続化を統合するサービス。
//!
//! ## 設計方針
//!
//! - **明示的なロケール**: 呼び出し元が所有する [`LocaleContext`] を受け取り、
//!   組み立ての間だけ宛先ユーザーのロケールに切り替える
//! - **型付きの結果**: 配信済み・拒否・ドライランを [`DispatchOutcome`] で区別する。
//!   配信サービスの拒否（400）はエラーではなく結果として返す
//! - **単発と一括で永続化を共有**: どちらも [`NotificationPersister`] を通す

use std::sync::Arc;

use herald_domain::{
    clock::Clock,
    locale::LocaleContext,
    notification::{DispatchResponse, NotificationRecord, NotificationRequest, WirePayload},
};
use herald_infra::{
    delivery::{DeliveryClient, DeliveryError},
    repository::{NotificationRepository, UserDirectory},
};
use herald_shared::{
    event_log::{error, event},
    log_business_event,
};
use serde::Serialize;
use serde_json::{Map, Value};

use super::{
    composer::PayloadComposer,
    locale::LocaleSwitcher,
    persistence::NotificationPersister,
    recipient::RecipientResolver,
    template_renderer::TemplateRenderer,
};
use crate::error::DispatcherError;

/// 単発送信の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// 配信サービスに登録され、レコードを保存した
    Delivered(NotificationRecord),
    /// 送信しなかった（`dump` 指定、または宛先が空）
    DryRun(WirePayload),
    /// 配信サービスが入力を拒否した
    Rejected(String),
}

impl DispatchOutcome {
    /// 保存したレコード（配信済みの場合のみ）
    pub fn into_record(self) -> Option<NotificationRecord> {
        match self {
            Self::Delivered(record) => Some(record),
            Self::DryRun(_) | Self::Rejected(_) => None,
        }
    }
}

/// 一括送信の結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum BulkOutcome {
    /// 配信サービスが返した順に保存したレコード
    Delivered(Vec<NotificationRecord>),
    /// 配信サービスが入力を拒否した
    Rejected(String),
}

impl BulkOutcome {
    /// 保存したレコード（拒否された場合は `None`）
    pub fn into_records(self) -> Option<Vec<NotificationRecord>> {
        match self {
            Self::Delivered(records) => Some(records),
            Self::Rejected(_) => None,
        }
    }
}

/// 通知サービス
pub struct NotificationService {
    locale_switcher: LocaleSwitcher,
    composer:        PayloadComposer,
    client:          Arc<dyn DeliveryClient>,
    persister:       NotificationPersister,
}

impl NotificationService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        repository: Arc<dyn NotificationRepository>,
        client: Arc<dyn DeliveryClient>,
        renderer: Arc<TemplateRenderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            locale_switcher: LocaleSwitcher::new(users.clone()),
            composer: PayloadComposer::new(renderer),
            client,
            persister: NotificationPersister::new(
                RecipientResolver::new(users),
                repository,
                clock,
            ),
        }
    }

    /// 1 件の通知を送信する
    ///
    /// 宛先ユーザーのロケールでペイロードを組み立てる。`context` のロケールは
    /// 戻った時点で（エラー時も含め）呼び出し前の値に戻っている。
    ///
    /// `dump` 指定または宛先が空の場合は送信せず、組み立てたペイロードを返す。
    pub async fn send(
        &self,
        context: &mut LocaleContext,
        request: NotificationRequest,
    ) -> Result<DispatchOutcome, DispatcherError> {
        let locale = self
            .locale_switcher
            .locale_for(&request.recipient)
            .await
            .map_err(|e| {
                tracing::error!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::USER_LOOKUP,
                    error = %e,
                    "宛先ユーザーの検索に失敗"
                );
                DispatcherError::from(e)
            })?;

        let payload = {
            let scope = context.scoped(locale);
            self.composer.compose(&request, &scope).map_err(|e| {
                tracing::error!(
                    error.kind = error::kind::TEMPLATE,
                    error = %e,
                    locale = %scope.active(),
                    "通知本文の組み立てに失敗"
                );
                DispatcherError::from(e)
            })?
        };
        let metadata = request.record_metadata();

        if request.dump || !payload.has_recipient() {
            log_business_event!(
                event.category = event::category::NOTIFICATION,
                event.action = event::action::NOTIFICATION_DRY_RUN,
                event.entity_type = event::entity_type::NOTIFICATION,
                event.result = event::result::SKIPPED,
                notification.method = %payload.delivery_method,
                notification.dump = request.dump,
                "通知を送信せずにペイロードを返しました"
            );
            return Ok(DispatchOutcome::DryRun(payload));
        }

        let response = match self.client.send(&payload).await {
            Ok(response) => response,
            Err(DeliveryError::Rejected(detail)) => {
                log_rejected(&payload, &detail);
                return Ok(DispatchOutcome::Rejected(detail));
            }
            Err(e) => {
                log_delivery_failure(&e);
                return Err(e.into());
            }
        };

        let record = self.save(&response, metadata).await?;

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_SENT,
            event.entity_type = event::entity_type::NOTIFICATION,
            event.entity_id = %record.code_name,
            event.result = event::result::SUCCESS,
            notification.method = %payload.delivery_method,
            notification.type_code = %record.notification_type,
            "通知を送信しました"
        );

        Ok(DispatchOutcome::Delivered(record))
    }

    /// 複数の通知を 1 リクエストで送信する
    ///
    /// 空の入力では送信せず、空の結果を返す。
    /// 配信サービスが返した通知は、メタデータなしで順に保存する。
    pub async fn bulk_send(
        &self,
        notifications: Vec<WirePayload>,
    ) -> Result<BulkOutcome, DispatcherError> {
        if notifications.is_empty() {
            return Ok(BulkOutcome::Delivered(Vec::new()));
        }

        let response = match self.client.send_bulk(&notifications).await {
            Ok(response) => response,
            Err(DeliveryError::Rejected(detail)) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_REJECTED,
                    event.entity_type = event::entity_type::NOTIFICATION,
                    event.result = event::result::FAILURE,
                    notification.count = notifications.len(),
                    error = %detail,
                    "配信サービスが一括送信を拒否しました"
                );
                return Ok(BulkOutcome::Rejected(detail));
            }
            Err(e) => {
                log_delivery_failure(&e);
                return Err(e.into());
            }
        };

        let mut records = Vec::with_capacity(response.notifications.len());
        for notification in &response.notifications {
            records.push(self.save(notification, Map::new()).await?);
        }

        log_business_event!(
            event.category = event::category::NOTIFICATION,
            event.action = event::action::NOTIFICATION_BULK_SENT,
            event.entity_type = event::entity_type::NOTIFICATION,
            event.result = event::result::SUCCESS,
            notification.requested = notifications.len(),
            notification.saved = records.len(),
            "通知を一括送信しました"
        );

        Ok(BulkOutcome::Delivered(records))
    }

    async fn save(
        &self,
        response: &DispatchResponse,
        metadata: Map<String, Value>,
    ) -> Result<NotificationRecord, DispatcherError> {
        self.persister
            .persist(response, metadata)
            .await
            .map_err(|e| {
                tracing::error!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::DATABASE,
                    error = %e,
                    code_name = %response.id,
                    "通知レコードの保存に失敗"
                );
                DispatcherError::from(e)
            })
    }
}

fn log_rejected(payload: &WirePayload, detail: &str) {
    log_business_event!(
        event.category = event::category::NOTIFICATION,
        event.action = event::action::NOTIFICATION_REJECTED,
        event.entity_type = event::entity_type::NOTIFICATION,
        event.result = event::result::FAILURE,
        notification.method = %payload.delivery_method,
        error = %detail,
        "配信サービスが通知を拒否しました"
    );
}

fn log_delivery_failure(err: &DeliveryError) {
    tracing::error!(
        error.category = error::category::EXTERNAL_SERVICE,
        error.kind = error::kind::SERVICE_COMMUNICATION,
        error = %err,
        "配信サービスとの通信に失敗"
    );
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use herald_domain::{
        clock::FixedClock,
        locale::Locale,
        notification::{DeliveryMethod, NotificationStatus},
        user::{Email, User, UserId},
    };
    use herald_infra::mock::{
        MockDeliveryBehavior,
        MockDeliveryClient,
        MockNotificationRepository,
        MockUserDirectory,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    struct Fixture {
        service:    NotificationService,
        users:      MockUserDirectory,
        repository: MockNotificationRepository,
        client:     MockDeliveryClient,
    }

    fn setup() -> Fixture {
        let users = MockUserDirectory::new();
        let repository = MockNotificationRepository::new();
        let client = MockDeliveryClient::new();
        let service = NotificationService::new(
            Arc::new(users.clone()),
            Arc::new(repository.clone()),
            Arc::new(client.clone()),
            Arc::new(TemplateRenderer::new().unwrap()),
            Arc::new(FixedClock::new(
                Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap(),
            )),
        );
        Fixture {
            service,
            users,
            repository,
            client,
        }
    }

    fn context() -> LocaleContext {
        LocaleContext::new(Locale::new("en").unwrap())
    }

    fn make_payload(recipient: &str) -> WirePayload {
        WirePayload {
            is_internal_recipient: false,
            recipient:             recipient.to_string(),
            delivery_method:       DeliveryMethod::Email,
            message_subject:       "Hi".to_string(),
            message_body:          "Hello".to_string(),
            sender:                None,
        }
    }

    #[tokio::test]
    async fn test_宛先なしのユーザーでも送信してレコードを保存する() {
        let fixture = setup();
        fixture
            .client
            .set_behavior(MockDeliveryBehavior::EchoWithId("42".to_string()));
        let request = NotificationRequest::new("a@x.com")
            .with_subject("Hi")
            .with_text("Hello");

        let outcome = fixture.service.send(&mut context(), request).await.unwrap();

        assert_eq!(fixture.client.sent(), vec![make_payload("a@x.com")]);
        let record = outcome.into_record().expect("レコードが保存されること");
        assert_eq!(record.code_name, "42");
        assert_eq!(record.notification_type, "EMAIL");
        assert_eq!(record.target_id, None);
        assert_eq!(record.status, NotificationStatus::Notified);
        assert_eq!(fixture.repository.records(), vec![record]);
    }

    #[tokio::test]
    async fn test_宛先が空なら送信も保存もせずペイロードを返す() {
        let fixture = setup();
        let request = NotificationRequest::new("").with_subject("Hi").with_text("Hello");

        let outcome = fixture.service.send(&mut context(), request).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::DryRun(make_payload("")));
        assert_eq!(fixture.client.request_count(), 0);
        assert_eq!(fixture.repository.upsert_count(), 0);
        assert_eq!(fixture.users.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_dump指定なら宛先があっても送信しない() {
        let fixture = setup();
        let request = NotificationRequest::new("a@x.com")
            .with_subject("Hi")
            .with_text("Hello")
            .dump();

        let outcome = fixture.service.send(&mut context(), request).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::DryRun(make_payload("a@x.com")));
        assert_eq!(fixture.client.request_count(), 0);
        assert_eq!(outcome.into_record(), None);
    }

    #[tokio::test]
    async fn test_ユーザーのロケールでレンダリングし送信後に元のロケールへ戻す() {
        let fixture = setup();
        fixture.users.add_user(User::new(
            UserId::new(),
            Some(Email::new("fr@x.com").unwrap()),
            None,
            Some(Locale::new("fr").unwrap()),
        ));
        let mut payload = Map::new();
        payload.insert("title".to_string(), json!("Bienvenue"));
        let request = NotificationRequest::new("fr@x.com").with_html("", payload);
        let mut context = context();

        fixture.service.send(&mut context, request).await.unwrap();

        let sent = fixture.client.sent();
        assert!(sent[0].message_body.contains(r#"lang="fr""#));
        assert_eq!(context.active(), &Locale::new("en").unwrap());
    }

    #[tokio::test]
    async fn test_テンプレートエラーでもロケールは元に戻る() {
        let fixture = setup();
        fixture.users.add_user(User::new(
            UserId::new(),
            Some(Email::new("fr@x.com").unwrap()),
            None,
            Some(Locale::new("fr").unwrap()),
        ));
        let mut payload = Map::new();
        payload.insert("title".to_string(), json!("x"));
        let request = NotificationRequest::new("fr@x.com").with_html("mail/missing", payload);
        let mut context = context();

        let result = fixture.service.send(&mut context, request).await;

        assert!(matches!(result, Err(DispatcherError::Template(_))));
        assert_eq!(context.active(), &Locale::new("en").unwrap());
        assert_eq!(fixture.client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_拒否された場合は保存せずrejectedを返す() {
        let fixture = setup();
        fixture
            .client
            .set_behavior(MockDeliveryBehavior::Reject("invalid recipient".to_string()));

        let outcome = fixture
            .service
            .send(&mut context(), NotificationRequest::new("bad"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Rejected("invalid recipient".to_string())
        );
        assert_eq!(fixture.repository.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_通信エラーはdeliveryエラーとして伝播する() {
        let fixture = setup();
        fixture
            .client
            .set_behavior(MockDeliveryBehavior::Fail("connection refused".to_string()));

        let result = fixture
            .service
            .send(&mut context(), NotificationRequest::new("a@x.com"))
            .await;

        assert!(matches!(
            result,
            Err(DispatcherError::Delivery(DeliveryError::Network(_)))
        ));
        assert_eq!(fixture.repository.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_メタデータのタイトルと説明は文字列化して保存する() {
        let fixture = setup();
        let request = NotificationRequest::new("a@x.com")
            .with_metadata("title", 5)
            .with_metadata("description", json!(null))
            .with_metadata("loan_id", 99);

        let record = fixture
            .service
            .send(&mut context(), request)
            .await
            .unwrap()
            .into_record()
            .unwrap();

        assert_eq!(record.metadata.get("title"), Some(&json!("5")));
        assert_eq!(record.metadata.get("description"), Some(&json!("")));
        assert_eq!(record.metadata.get("loan_id"), Some(&json!(99)));
    }

    #[tokio::test]
    async fn test_同じidで2回送信してもレコードは1件で後勝ちになる() {
        let fixture = setup();
        fixture
            .client
            .set_behavior(MockDeliveryBehavior::EchoWithId("42".to_string()));

        fixture
            .service
            .send(&mut context(), NotificationRequest::new("a@x.com").with_subject("first"))
            .await
            .unwrap();
        fixture
            .service
            .send(&mut context(), NotificationRequest::new("a@x.com").with_subject("second"))
            .await
            .unwrap();

        let records = fixture.repository.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "second");
    }

    #[tokio::test]
    async fn test_空の一括送信は送信せずに空を返す() {
        let fixture = setup();

        let outcome = fixture.service.bulk_send(Vec::new()).await.unwrap();

        assert_eq!(outcome, BulkOutcome::Delivered(Vec::new()));
        assert_eq!(fixture.client.request_count(), 0);
    }

    #[tokio::test]
    async fn test_一括送信はレスポンスの順にメタデータなしで保存する() {
        let fixture = setup();

        let outcome = fixture
            .service
            .bulk_send(vec![make_payload("a@x.com"), make_payload("b@x.com")])
            .await
            .unwrap();

        let records = outcome.into_records().unwrap();
        let recipients: Vec<_> = records
            .iter()
            .map(|r| r.data["recipient"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(recipients, vec!["a@x.com", "b@x.com"]);
        assert!(records.iter().all(|r| r.metadata.is_empty()));
        assert_eq!(fixture.client.batches().len(), 1);
    }

    #[tokio::test]
    async fn test_一括送信が拒否された場合は何も保存しない() {
        let fixture = setup();
        fixture
            .client
            .set_behavior(MockDeliveryBehavior::Reject("bad batch".to_string()));

        let outcome = fixture
            .service
            .bulk_send(vec![make_payload("a@x.com")])
            .await
            .unwrap();

        assert_eq!(outcome, BulkOutcome::Rejected("bad batch".to_string()));
        assert_eq!(outcome.into_records(), None);
        assert_eq!(fixture.repository.upsert_count(), 0);
    }

    #[test]
    fn test_結果はタグ付きのjsonとして出力される() {
        let outcome = DispatchOutcome::Rejected("invalid".to_string());

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"outcome": "rejected", "value": "invalid"})
        );
    }
}
