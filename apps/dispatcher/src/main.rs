//! # Herald Dispatcher
//!
//! 標準入力から JSON を読み、通知を配信して結果を JSON で標準出力に書き出す。
//!
//! ## 使い方
//!
//! ```bash
//! # 単発送信（NotificationRequest）
//! echo '{"recipient": "a@x.com", "subject": "Hi", "template": {"text": "Hello"}}' \
//!   | herald-dispatcher
//!
//! # 一括送信（WirePayload の配列）
//! herald-dispatcher --bulk < notifications.json
//!
//! # アラート送信先全員へ送信（NotificationRequest）
//! herald-dispatcher --alert < alert.json
//! ```
//!
//! ## 環境変数
//!
//! [`herald_dispatcher::config`] を参照。ログ形式は `LOG_FORMAT`（`json` | `pretty`）、
//! ログレベルは `RUST_LOG` で制御する。

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use herald_dispatcher::{
    config::DispatcherConfig,
    usecase::{AlertFanOut, NotificationService, notification::TemplateRenderer},
};
use herald_domain::{
    clock::SystemClock,
    locale::LocaleContext,
    notification::{NotificationRequest, WirePayload},
};
use herald_infra::{
    db,
    delivery::HttpDeliveryClient,
    repository::{
        PostgresAlertAddressRepository,
        PostgresNotificationRepository,
        PostgresUserDirectory,
    },
};
use herald_shared::observability::{TracingConfig, init_tracing};
use tokio::io::AsyncReadExt;

/// コマンドライン引数
#[derive(Debug, Parser)]
#[command(name = "herald-dispatcher", version, about = "通知を配信サービスへ送る")]
struct Cli {
    /// 標準入力を WirePayload の配列として一括送信する
    #[arg(long, conflicts_with = "alert")]
    bulk: bool,

    /// 標準入力の通知をアラート送信先全員へ送る
    #[arg(long)]
    alert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Send,
    Bulk,
    Alert,
}

impl Cli {
    fn mode(&self) -> Mode {
        match (self.bulk, self.alert) {
            (true, _) => Mode::Bulk,
            (_, true) => Mode::Alert,
            _ => Mode::Send,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let mode = Cli::parse().mode();

    init_tracing(TracingConfig::from_env("herald-dispatcher"));

    let config = DispatcherConfig::from_env().context("設定の読み込みに失敗しました")?;

    let pool = db::create_pool(&config.database_url, db::PoolSettings::default())
        .await
        .context("データベース接続に失敗しました")?;
    tracing::info!("データベースに接続しました");

    db::run_migrations(&pool)
        .await
        .context("マイグレーションの実行に失敗しました")?;
    tracing::info!("マイグレーションを適用しました");

    let renderer = match &config.template_dir {
        Some(dir) => TemplateRenderer::with_template_dir(dir)?,
        None => TemplateRenderer::new()?,
    };

    let users = Arc::new(PostgresUserDirectory::new(pool.clone()));
    let service = Arc::new(NotificationService::new(
        users.clone(),
        Arc::new(PostgresNotificationRepository::new(pool.clone())),
        Arc::new(HttpDeliveryClient::new(
            &config.delivery.host,
            &config.delivery.secret_key,
        )?),
        Arc::new(renderer),
        Arc::new(SystemClock),
    ));

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("標準入力の読み込みに失敗しました")?;

    let mut context = LocaleContext::new(config.default_locale.clone());

    let output = match mode {
        Mode::Send => {
            let request: NotificationRequest =
                serde_json::from_str(&input).context("通知リクエストの JSON が不正です")?;
            let outcome = service.send(&mut context, request).await?;
            serde_json::to_string_pretty(&outcome)?
        }
        Mode::Bulk => {
            let notifications: Vec<WirePayload> =
                serde_json::from_str(&input).context("一括送信の JSON が不正です")?;
            let outcome = service.bulk_send(notifications).await?;
            serde_json::to_string_pretty(&outcome)?
        }
        Mode::Alert => {
            let request: NotificationRequest =
                serde_json::from_str(&input).context("通知リクエストの JSON が不正です")?;
            let fan_out = AlertFanOut::new(
                service,
                users,
                Arc::new(PostgresAlertAddressRepository::new(pool)),
            );
            fan_out.alert_all(&mut context, request).await?;
            serde_json::json!({"outcome": "alerted"}).to_string()
        }
    };

    println!("{output}");
    Ok(())
}
