//! # 宛先リゾルバー
//!
//! 配信レスポンスの宛先・送信者の識別子から、ユーザーディレクトリのユーザーを逆引きする。
//!
//! 逆引きできるのはメール（メールアドレス一致）と SMS（電話番号一致）のみ。
//! それ以外の配信方法や未知の文字列は、検索せずに `None` を返す。

use std::{str::FromStr, sync::Arc};

use herald_domain::{notification::DeliveryMethod, user::UserId};
use herald_infra::{InfraError, repository::UserDirectory};

/// 宛先リゾルバー
pub struct RecipientResolver {
    users: Arc<dyn UserDirectory>,
}

impl RecipientResolver {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// 配信方法と識別子からユーザー ID を引く
    ///
    /// 配信方法の文字列は大文字小文字を区別しない（`EMAIL` と `email` は同じ）。
    pub async fn resolve_user(
        &self,
        method: &str,
        identifier: &str,
    ) -> Result<Option<UserId>, InfraError> {
        if identifier.is_empty() {
            return Ok(None);
        }

        let Some(method) = DeliveryMethod::from_str(method)
            .ok()
            .filter(DeliveryMethod::is_resolvable)
        else {
            return Ok(None);
        };

        let user = if method == DeliveryMethod::Sms {
            self.users.find_by_phone(identifier).await?
        } else {
            self.users.find_by_email(identifier).await?
        };

        Ok(user.map(|u| u.id().clone()))
    }
}
