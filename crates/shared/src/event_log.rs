//! # ビジネスイベントログ
//!
//! 配信・却下・ドライラン・アラート展開といった、運用で追跡したい出来事を
//! 決まったフィールド名で記録する。
//!
//! JSON 出力では `event.kind = "business_event"` の行だけを抜き出せば
//! 通知の履歴を追える:
//!
//! ```text
//! jq 'select(.["event.kind"] == "business_event")'
//! ```

/// `tracing::info!` に `event.kind = "business_event"` を付けて出力する
///
/// `event.category`・`event.action`・`event.result` には下の定数を使う。
/// 対象が特定できる場合は `event.entity_type` と `event.entity_id` も付ける。
#[macro_export]
macro_rules! log_business_event {
    ($($args:tt)*) => {
        ::tracing::info!(
            event.kind = "business_event",
            $($args)*
        )
    };
}

/// イベントフィールドの定数
pub mod event {
    /// イベントカテゴリ
    pub mod category {
        pub const NOTIFICATION: &str = "notification";
        pub const ALERT: &str = "alert";
    }

    /// イベントアクション
    pub mod action {
        // 通知
        pub const NOTIFICATION_SENT: &str = "notification.sent";
        pub const NOTIFICATION_BULK_SENT: &str = "notification.bulk_sent";
        pub const NOTIFICATION_REJECTED: &str = "notification.rejected";
        pub const NOTIFICATION_DRY_RUN: &str = "notification.dry_run";

        // アラート
        pub const ALERT_FANNED_OUT: &str = "notification.alerted";
    }

    /// エンティティ種別
    pub mod entity_type {
        pub const NOTIFICATION: &str = "notification";
        pub const ALERT_ADDRESS: &str = "alert_address";
    }

    /// イベント結果
    pub mod result {
        pub const SUCCESS: &str = "success";
        pub const FAILURE: &str = "failure";
        pub const SKIPPED: &str = "skipped";
    }
}

/// エラーコンテキストフィールドの定数
pub mod error {
    /// エラーカテゴリ
    pub mod category {
        /// インフラストラクチャ（DB）
        pub const INFRASTRUCTURE: &str = "infrastructure";
        /// 外部サービス呼び出し（通知配信サービス）
        pub const EXTERNAL_SERVICE: &str = "external_service";
    }

    /// エラー種別
    pub mod kind {
        pub const DATABASE: &str = "database";
        pub const TEMPLATE: &str = "template";
        pub const USER_LOOKUP: &str = "user_lookup";
        pub const SERVICE_COMMUNICATION: &str = "service_communication";
    }
}
