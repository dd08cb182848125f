//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリのリポジトリと配信クライアント。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! herald-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use herald_domain::{
    alert::AlertAddress,
    notification::{
        BulkDispatchResponse,
        DispatchResponse,
        NotificationKey,
        NotificationRecord,
        WirePayload,
    },
    role::RoleName,
    user::{Email, User},
};
use serde_json::json;

use crate::{
    delivery::{DeliveryClient, DeliveryError},
    error::InfraError,
    repository::{AlertAddressRepository, NotificationRepository, UserDirectory},
};

// ===== MockUserDirectory =====

#[derive(Clone, Default)]
pub struct MockUserDirectory {
    users:   Arc<Mutex<Vec<(User, Vec<RoleName>)>>>,
    lookups: Arc<Mutex<usize>>,
}

impl MockUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: User) {
        self.add_user_with_roles(user, Vec::new());
    }

    pub fn add_user_with_roles(&self, user: User, roles: Vec<RoleName>) {
        self.users.lock().unwrap().push((user, roles));
    }

    /// 検索メソッドが呼ばれた回数
    pub fn lookup_count(&self) -> usize {
        *self.lookups.lock().unwrap()
    }

    fn find_first(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        *self.lookups.lock().unwrap() += 1;
        self.users
            .lock()
            .unwrap()
            .iter()
            .map(|(user, _)| user)
            .find(|user| predicate(user))
            .cloned()
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, InfraError> {
        Ok(self.find_first(|u| u.email().is_some_and(|e| e.as_str() == email)))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, InfraError> {
        Ok(self.find_first(|u| u.phone().is_some_and(|p| p.as_str() == phone)))
    }

    async fn find_by_email_or_phone(&self, identifier: &str) -> Result<Option<User>, InfraError> {
        Ok(self.find_first(|u| u.matches_identifier(identifier)))
    }

    async fn find_by_roles(&self, roles: &[RoleName]) -> Result<Vec<User>, InfraError> {
        *self.lookups.lock().unwrap() += 1;
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, user_roles)| user_roles.iter().any(|r| roles.contains(r)))
            .map(|(user, _)| user.clone())
            .collect();
        users.sort_by(|a, b| a.email().map(Email::as_str).cmp(&b.email().map(Email::as_str)));
        Ok(users)
    }
}

// ===== MockAlertAddressRepository =====

#[derive(Clone, Default)]
pub struct MockAlertAddressRepository {
    addresses: Arc<Mutex<Vec<AlertAddress>>>,
    loads:     Arc<Mutex<usize>>,
}

impl MockAlertAddressRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_address(&self, address: AlertAddress) {
        self.addresses.lock().unwrap().push(address);
    }

    /// `find_all` が呼ばれた回数
    pub fn load_count(&self) -> usize {
        *self.loads.lock().unwrap()
    }
}

#[async_trait]
impl AlertAddressRepository for MockAlertAddressRepository {
    async fn find_all(&self) -> Result<Vec<AlertAddress>, InfraError> {
        *self.loads.lock().unwrap() += 1;
        Ok(self.addresses.lock().unwrap().clone())
    }
}

// ===== MockNotificationRepository =====

/// 一意キーで upsert するインメモリ実装
///
/// PostgreSQL 実装と同じく、競合時は `id` と `created_at` を保持する。
#[derive(Clone, Default)]
pub struct MockNotificationRepository {
    records: Arc<Mutex<Vec<NotificationRecord>>>,
    upserts: Arc<Mutex<usize>>,
}

impl MockNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されているレコード（挿入順）
    pub fn records(&self) -> Vec<NotificationRecord> {
        self.records.lock().unwrap().clone()
    }

    /// `upsert` が呼ばれた回数
    pub fn upsert_count(&self) -> usize {
        *self.upserts.lock().unwrap()
    }
}

#[async_trait]
impl NotificationRepository for MockNotificationRepository {
    async fn upsert(&self, record: &NotificationRecord) -> Result<NotificationRecord, InfraError> {
        *self.upserts.lock().unwrap() += 1;
        let mut records = self.records.lock().unwrap();
        let key = record.key();

        if let Some(existing) = records.iter_mut().find(|r| r.key() == key) {
            let id = existing.id.clone();
            let created_at = existing.created_at;
            *existing = NotificationRecord {
                id,
                created_at,
                ..record.clone()
            };
            return Ok(existing.clone());
        }

        records.push(record.clone());
        Ok(record.clone())
    }

    async fn find_by_key(
        &self,
        key: &NotificationKey,
    ) -> Result<Option<NotificationRecord>, InfraError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| &r.key() == key)
            .cloned())
    }
}

// ===== MockDeliveryClient =====

/// モック配信クライアントの応答パターン
#[derive(Debug, Clone, Default)]
pub enum MockDeliveryBehavior {
    /// 送信内容をそのまま返す（ID は "1" からの連番）
    #[default]
    Echo,
    /// 送信内容をそのまま返し、ID は常に指定値
    EchoWithId(String),
    /// 400 相当で拒否する
    Reject(String),
    /// ネットワークエラーを返す
    Fail(String),
}

/// 送信内容を記録するモック配信クライアント
#[derive(Clone, Default)]
pub struct MockDeliveryClient {
    behavior: Arc<Mutex<MockDeliveryBehavior>>,
    sent:     Arc<Mutex<Vec<WirePayload>>>,
    batches:  Arc<Mutex<Vec<Vec<WirePayload>>>>,
    next_id:  Arc<Mutex<u64>>,
}

impl MockDeliveryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(behavior: MockDeliveryBehavior) -> Self {
        let client = Self::default();
        client.set_behavior(behavior);
        client
    }

    pub fn set_behavior(&self, behavior: MockDeliveryBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// 単発送信されたペイロード
    pub fn sent(&self) -> Vec<WirePayload> {
        self.sent.lock().unwrap().clone()
    }

    /// 一括送信されたバッチ
    pub fn batches(&self) -> Vec<Vec<WirePayload>> {
        self.batches.lock().unwrap().clone()
    }

    /// 単発・一括を合わせたリクエスト回数
    pub fn request_count(&self) -> usize {
        self.sent.lock().unwrap().len() + self.batches.lock().unwrap().len()
    }

    fn respond(&self, payload: &WirePayload) -> Result<DispatchResponse, DeliveryError> {
        let behavior = self.behavior.lock().unwrap().clone();
        let id = match behavior {
            MockDeliveryBehavior::Echo => {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                next_id.to_string()
            }
            MockDeliveryBehavior::EchoWithId(id) => id,
            MockDeliveryBehavior::Reject(body) => return Err(DeliveryError::Rejected(body)),
            MockDeliveryBehavior::Fail(msg) => return Err(DeliveryError::Network(msg)),
        };

        DispatchResponse::from_value(json!({
            "id": id,
            "recipient": payload.recipient,
            "sender": payload.sender,
            "delivery_method": payload.delivery_method.as_str(),
            "message_subject": payload.message_subject,
            "message_body": payload.message_body,
            "is_read": false,
        }))
        .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl DeliveryClient for MockDeliveryClient {
    async fn send(&self, payload: &WirePayload) -> Result<DispatchResponse, DeliveryError> {
        self.sent.lock().unwrap().push(payload.clone());
        self.respond(payload)
    }

    async fn send_bulk(
        &self,
        payloads: &[WirePayload],
    ) -> Result<BulkDispatchResponse, DeliveryError> {
        self.batches.lock().unwrap().push(payloads.to_vec());
        let notifications = payloads
            .iter()
            .map(|payload| self.respond(payload))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BulkDispatchResponse { notifications })
    }
}
