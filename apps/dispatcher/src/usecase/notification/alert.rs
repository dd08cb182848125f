//! # アラートファンアウト
//!
//! 1 件の通知（または一括送信のバッチ）を、ロールを持つユーザーや
//! アラート送信先アドレスの全員に送る。
//!
//! - 単発送信の拒否はループを止めない（拒否は結果として扱われる）
//! - 通信エラー・DB エラーはその時点で中断して返す
//! - アラート送信先アドレスは 1 インスタンスにつき最初の利用時に一度だけ読み込む

use std::sync::Arc;

use herald_domain::{
    alert::AlertAddress,
    locale::LocaleContext,
    notification::{NotificationRequest, WirePayload},
    role::RoleName,
};
use herald_infra::{
    InfraError,
    repository::{AlertAddressRepository, UserDirectory},
};
use herald_shared::{event_log::event, log_business_event};
use tokio::sync::OnceCell;

use super::service::NotificationService;
use crate::error::DispatcherError;

/// アラートファンアウト
pub struct AlertFanOut {
    service:   Arc<NotificationService>,
    users:     Arc<dyn UserDirectory>,
    addresses: Arc<dyn AlertAddressRepository>,
    cache:     OnceCell<Vec<AlertAddress>>,
}

impl AlertFanOut {
    pub fn new(
        service: Arc<NotificationService>,
        users: Arc<dyn UserDirectory>,
        addresses: Arc<dyn AlertAddressRepository>,
    ) -> Self {
        Self {
            service,
            users,
            addresses,
            cache: OnceCell::new(),
        }
    }

    /// ロールを持つユーザー全員に通知を送る
    ///
    /// `roles` が空の場合は [`RoleName::default_alert_roles`] を使う。
    /// 宛先はユーザーのメールアドレスで上書きする。
    pub async fn alert_by_roles(
        &self,
        context: &mut LocaleContext,
        roles: &[RoleName],
        request: NotificationRequest,
    ) -> Result<(), DispatcherError> {
        let default_roles;
        let roles = if roles.is_empty() {
            default_roles = RoleName::default_alert_roles();
            default_roles.as_slice()
        } else {
            roles
        };

        let users = self.users.find_by_roles(roles).await?;
        for user in &users {
            let request = NotificationRequest {
                recipient: user
                    .email()
                    .map(|e| e.as_str().to_string())
                    .unwrap_or_default(),
                ..request.clone()
            };
            self.service.send(context, request).await?;
        }

        log_business_event!(
            event.category = event::category::ALERT,
            event.action = event::action::ALERT_FANNED_OUT,
            event.entity_type = event::entity_type::NOTIFICATION,
            event.result = event::result::SUCCESS,
            alert.target = "roles",
            alert.recipients = users.len(),
            "ロール宛てのアラートを送信しました"
        );

        Ok(())
    }

    /// アラート送信先アドレス全員に通知を送る
    ///
    /// 宛先はアドレスに紐付くユーザーのメールアドレス、なければアドレス自身のメールアドレス。
    /// どちらもない場合は宛先が空になり、送信されない。
    pub async fn alert_all(
        &self,
        context: &mut LocaleContext,
        request: NotificationRequest,
    ) -> Result<(), DispatcherError> {
        let addresses = self.alert_addresses().await?;
        for address in addresses {
            let request = NotificationRequest {
                recipient: recipient_of(address),
                ..request.clone()
            };
            self.service.send(context, request).await?;
        }

        log_business_event!(
            event.category = event::category::ALERT,
            event.action = event::action::ALERT_FANNED_OUT,
            event.entity_type = event::entity_type::ALERT_ADDRESS,
            event.result = event::result::SUCCESS,
            alert.target = "addresses",
            alert.recipients = addresses.len(),
            "アラート送信先にアラートを送信しました"
        );

        Ok(())
    }

    /// アラート送信先アドレスごとに、バッチ全体の宛先を上書きして一括送信する
    pub async fn alert_all_bulk(
        &self,
        notifications: Vec<WirePayload>,
    ) -> Result<(), DispatcherError> {
        let addresses = self.alert_addresses().await?;
        for address in addresses {
            let recipient = recipient_of(address);
            let batch = notifications
                .iter()
                .map(|payload| WirePayload {
                    recipient: recipient.clone(),
                    ..payload.clone()
                })
                .collect();
            self.service.bulk_send(batch).await?;
        }

        log_business_event!(
            event.category = event::category::ALERT,
            event.action = event::action::ALERT_FANNED_OUT,
            event.entity_type = event::entity_type::ALERT_ADDRESS,
            event.result = event::result::SUCCESS,
            alert.target = "addresses",
            alert.recipients = addresses.len(),
            alert.batch_size = notifications.len(),
            "アラート送信先に一括送信しました"
        );

        Ok(())
    }

    async fn alert_addresses(&self) -> Result<&[AlertAddress], InfraError> {
        self.cache
            .get_or_try_init(|| self.addresses.find_all())
            .await
            .map(Vec::as_slice)
    }
}

fn recipient_of(address: &AlertAddress) -> String {
    address
        .resolved_email()
        .map(|email| email.as_str().to_string())
        .unwrap_or_default()
}
