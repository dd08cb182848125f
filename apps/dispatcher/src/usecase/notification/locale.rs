//! # ロケールスイッチャー
//!
//! 宛先のユーザーを引き、そのユーザーのロケールを返す。
//! 実際の切り替えは呼び出し元が [`LocaleContext::scoped`] で行う。
//!
//! [`LocaleContext::scoped`]: herald_domain::locale::LocaleContext::scoped

use std::sync::Arc;

use herald_domain::locale::Locale;
use herald_infra::{InfraError, repository::UserDirectory};

/// 宛先のロケールを引くスイッチャー
pub struct LocaleSwitcher {
    users: Arc<dyn UserDirectory>,
}

impl LocaleSwitcher {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self { users }
    }

    /// 識別子（メールアドレスまたは電話番号）に一致するユーザーのロケール
    ///
    /// ユーザーが見つからない、またはロケール未設定の場合は `None`。
    /// 空の識別子では検索しない。
    pub async fn locale_for(&self, identifier: &str) -> Result<Option<Locale>, InfraError> {
        if identifier.is_empty() {
            return Ok(None);
        }

        let user = self.users.find_by_email_or_phone(identifier).await?;
        Ok(user.and_then(|u| u.locale().cloned()))
    }
}
