//! # UserDirectory
//!
//! 宛先・送信者の逆引きとロケール取得のためにユーザーを参照する。
//! ユーザーは外部で管理されており、このクレートからは読み取りのみ行う。
//!
//! ## 設計方針
//!
//! - **先頭一致のみ**: 同じ識別子を持つユーザーが複数いる場合は ID 順の先頭を返す
//! - **寛容な読み取り**: 空または不正なメールアドレス・電話番号・ロケールは未設定として扱う
//! - **ロールの一括取得**: JOIN で取得し、ユーザー単位で重複を除く

use async_trait::async_trait;
use herald_domain::{
    locale::Locale,
    role::RoleName,
    user::{Email, PhoneNumber, User, UserId},
};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::lenient;
use crate::error::InfraError;

/// ユーザーディレクトリトレイト
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// メールアドレスでユーザーを検索
    ///
    /// # 戻り値
    ///
    /// - `Ok(Some(user))`: ユーザーが見つかった場合
    /// - `Ok(None)`: ユーザーが見つからない場合
    /// - `Err(_)`: データベースエラー
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, InfraError>;

    /// 電話番号でユーザーを検索
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, InfraError>;

    /// メールアドレスまたは電話番号でユーザーを検索
    async fn find_by_email_or_phone(&self, identifier: &str) -> Result<Option<User>, InfraError>;

    /// いずれかのロールを持つユーザーをメールアドレス順に取得
    ///
    /// 空のスライスを渡した場合は空の Vec を返す。
    async fn find_by_roles(&self, roles: &[RoleName]) -> Result<Vec<User>, InfraError>;
}

#[derive(Debug, FromRow)]
struct UserRow {
    id:     Uuid,
    email:  String,
    phone:  Option<String>,
    locale: Option<String>,
}

/// ディレクトリの行はこのシステムの外で書かれるため、不正な値は未設定として読む
impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let email = lenient(Some(row.email), "email", Email::new);
        let phone = lenient(row.phone, "phone", PhoneNumber::new);
        let locale = lenient(row.locale, "locale", Locale::new);

        User::new(UserId::from_uuid(row.id), email, phone, locale)
    }
}

/// PostgreSQL 実装の UserDirectory
#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, phone, locale
            FROM users
            WHERE email = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, phone, locale
            FROM users
            WHERE phone = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_email_or_phone(&self, identifier: &str) -> Result<Option<User>, InfraError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, phone, locale
            FROM users
            WHERE email = $1 OR phone = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(roles = roles.len()))]
    async fn find_by_roles(&self, roles: &[RoleName]) -> Result<Vec<User>, InfraError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT DISTINCT u.id, u.email, u.phone, u.locale
            FROM users u
            INNER JOIN user_roles ur ON ur.user_id = u.id
            INNER JOIN roles r ON r.id = ur.role_id
            WHERE r.name = ANY($1)
            ORDER BY u.email, u.id
            "#,
        )
        .bind(&names)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
