//! # アラート送信先アドレス
//!
//! 運用アラートの配信先として外部で管理されている参照リスト。
//! 各アドレスはユーザーに紐付くか、単独のメールアドレスを持つ。

use crate::user::Email;

define_uuid_id! {
    /// アラート送信先アドレス ID
    pub struct AlertAddressId;
}

/// アラート送信先アドレス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertAddress {
    id:         AlertAddressId,
    /// 単独のメールアドレス
    email:      Option<Email>,
    /// 紐付くユーザーのメールアドレス
    user_email: Option<Email>,
}

impl AlertAddress {
    pub fn new(id: AlertAddressId, email: Option<Email>, user_email: Option<Email>) -> Self {
        Self {
            id,
            email,
            user_email,
        }
    }

    pub fn id(&self) -> &AlertAddressId {
        &self.id
    }

    /// 配信に使うメールアドレス
    ///
    /// ユーザーに紐付く場合はユーザーのメールアドレスを優先し、
    /// そうでなければアドレス自身のメールアドレスを使う。
    pub fn resolved_email(&self) -> Option<&Email> {
        self.user_email.as_ref().or(self.email.as_ref())
    }
}
