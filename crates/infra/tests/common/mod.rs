//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するエンティティ生成ヘルパー。
//! Rust の統合テスト規約に従い `tests/common/mod.rs` に配置。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use herald_domain::{
    notification::{NotificationId, NotificationRecord, NotificationStatus},
    user::UserId,
};
use serde_json::{Map, json};
use sqlx::PgPool;
use uuid::Uuid;

/// ユーザーを DB に作成する
pub async fn insert_user(
    pool: &PgPool,
    email: &str,
    phone: Option<&str>,
    locale: Option<&str>,
) -> UserId {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO users (id, email, phone, locale) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind(email)
        .bind(phone)
        .bind(locale)
        .execute(pool)
        .await
        .expect("ユーザー作成に失敗");
    UserId::from_uuid(id)
}

/// ロールを作成し、指定ユーザーに割り当てる
pub async fn assign_role(pool: &PgPool, user_id: &UserId, role: &str) {
    sqlx::query(
        r#"
        INSERT INTO roles (id, name) VALUES ($1, $2)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(role)
    .execute(pool)
    .await
    .expect("ロール作成に失敗");

    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role_id)
        SELECT $1, id FROM roles WHERE name = $2
        "#,
    )
    .bind(user_id.as_uuid())
    .bind(role)
    .execute(pool)
    .await
    .expect("ロール割り当てに失敗");
}

/// アラート送信先アドレスを作成する
pub async fn insert_alert_address(
    pool: &PgPool,
    user_id: Option<&UserId>,
    email: Option<&str>,
    created_at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO alert_addresses (id, user_id, email, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::now_v7())
    .bind(user_id.map(|id| *id.as_uuid()))
    .bind(email)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("アラート送信先作成に失敗");
}

/// テスト用の固定時刻
pub fn fixed_time(offset_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000 + offset_secs, 0).expect("有効なタイムスタンプ")
}

/// テスト用の通知レコードを生成する
pub fn make_record(
    code_name: &str,
    notification_type: &str,
    target_id: Option<UserId>,
    title: &str,
) -> NotificationRecord {
    let now = fixed_time(0);
    let mut metadata = Map::new();
    metadata.insert("title".to_string(), json!(title));

    NotificationRecord {
        id: NotificationId::new(),
        title: title.to_string(),
        description: String::new(),
        read: false,
        timestamp: now,
        edited_timestamp: now,
        target_id,
        user_id: None,
        code_name: code_name.to_string(),
        notification_type: notification_type.to_string(),
        data: json!({"id": code_name}),
        status: NotificationStatus::Notified,
        metadata,
        created_at: now,
        updated_at: now,
    }
}
