//! # ユーザー
//!
//! 通知の受信者・送信者を解決するためのユーザーディレクトリのエントリを定義する。
//! ユーザーは外部で管理されており、この crate は読み取りのみ行う。
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use herald_domain::{
//!     locale::Locale,
//!     user::{Email, User, UserId},
//! };
//!
//! let user = User::new(
//!     UserId::new(),
//!     Some(Email::new("user@example.com")?),
//!     None,
//!     Some(Locale::new("fr")?),
//! );
//!
//! assert!(user.matches_identifier("user@example.com"));
//! assert_eq!(user.locale().map(Locale::as_str), Some("fr"));
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::{DomainError, locale::Locale};

define_uuid_id! {
    /// ユーザー ID（一意識別子）
    pub struct UserId;
}

define_validated_string! {
    /// 電話番号（SMS 配信の宛先）
    ///
    /// 形式は配信サービス側で検証されるため、ここでは空でないことと長さのみ確認する。
    pub struct PhoneNumber {
        label: "電話番号",
        max_length: 32,
        pii: true,
    }
}

/// メールアドレス（値オブジェクト）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// メールアドレスを作成する
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - `local@domain` の形式である
    /// - 最大 255 文字
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();

        if value.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスは必須です".to_string(),
            ));
        }

        let Some((local, domain)) = value.split_once('@') else {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        };

        if local.is_empty() || domain.is_empty() {
            return Err(DomainError::Validation(
                "メールアドレスの形式が不正です".to_string(),
            ));
        }

        if value.len() > 255 {
            return Err(DomainError::Validation(
                "メールアドレスは255文字以内である必要があります".to_string(),
            ));
        }

        Ok(Self(value))
    }

    /// 文字列参照を取得する
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// ユーザー
///
/// ディレクトリは外部で管理されており、メールアドレスが空のユーザーもいる。
/// その場合 `email` は `None` になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id:     UserId,
    email:  Option<Email>,
    phone:  Option<PhoneNumber>,
    locale: Option<Locale>,
}

impl User {
    pub fn new(
        id: UserId,
        email: Option<Email>,
        phone: Option<PhoneNumber>,
        locale: Option<Locale>,
    ) -> Self {
        Self {
            id,
            email,
            phone,
            locale,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    /// ユーザーが設定した表示ロケール（未設定なら `None`）
    pub fn locale(&self) -> Option<&Locale> {
        self.locale.as_ref()
    }

    /// 識別子がメールアドレスまたは電話番号に一致するか
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.email.as_ref().is_some_and(|e| e.as_str() == identifier)
            || self.phone.as_ref().is_some_and(|p| p.as_str() == identifier)
    }
}
