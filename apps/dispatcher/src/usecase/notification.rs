//! # 通知ユースケース
//!
//! 通知の組み立て・配信・永続化と、アラートのファンアウトを統合する。
//!
//! ## モジュール構成
//!
//! - [`template_renderer`] - tera テンプレートエンジンによる HTML 本文の生成
//! - [`locale`] - 宛先ユーザーのロケール取得
//! - [`composer`] - 通知リクエストから送信ペイロードを組み立てる
//! - [`recipient`] - 宛先・送信者の逆引き
//! - [`persistence`] - 配信レスポンスを通知レコードとして upsert
//! - [`service`] - 単発送信・一括送信
//! - [`alert`] - ロール・アラート送信先へのファンアウト

pub mod alert;
pub mod composer;
pub mod locale;
pub mod persistence;
pub mod recipient;
pub mod service;
pub mod template_renderer;

pub use alert::AlertFanOut;
pub use composer::PayloadComposer;
pub use locale::LocaleSwitcher;
pub use persistence::NotificationPersister;
pub use recipient::RecipientResolver;
pub use service::{BulkOutcome, DispatchOutcome, NotificationService};
pub use template_renderer::TemplateRenderer;
