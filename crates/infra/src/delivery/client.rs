//! reqwest による通知配信クライアント実装

use async_trait::async_trait;
use herald_domain::notification::{
    BulkDispatchResponse,
    BulkPayload,
    DispatchResponse,
    WirePayload,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::{DeliveryClient, error::DeliveryError, response::handle_response};

const SINGLE_PATH: &str = "notification/waiting/";
const BULK_PATH: &str = "notification/waiting/bulk/";

/// 通知配信クライアント実装
#[derive(Debug, Clone)]
pub struct HttpDeliveryClient {
    base_url: String,
    client:   reqwest::Client,
}

impl HttpDeliveryClient {
    /// 新しいクライアントを作成する
    ///
    /// # 引数
    ///
    /// - `host`: 配信サービスのベース URL（例: `https://notify.example.com/api`）
    /// - `secret_key`: Bearer トークン
    pub fn new(host: &str, secret_key: &str) -> Result<Self, DeliveryError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {secret_key}"))
            .map_err(|e| DeliveryError::Configuration(e.to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DeliveryError::Configuration(e.to_string()))?;

        Ok(Self {
            base_url: host.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl DeliveryClient for HttpDeliveryClient {
    #[tracing::instrument(skip_all, level = "debug", fields(method = %payload.delivery_method))]
    async fn send(&self, payload: &WirePayload) -> Result<DispatchResponse, DeliveryError> {
        let response = self
            .client
            .post(self.url(SINGLE_PATH))
            .json(payload)
            .send()
            .await?;

        let body = handle_response(response).await?;
        DispatchResponse::from_value(body).map_err(|e| DeliveryError::InvalidResponse(e.to_string()))
    }

    #[tracing::instrument(skip_all, level = "debug", fields(count = payloads.len()))]
    async fn send_bulk(
        &self,
        payloads: &[WirePayload],
    ) -> Result<BulkDispatchResponse, DeliveryError> {
        let response = self
            .client
            .post(self.url(BULK_PATH))
            .json(&BulkPayload {
                notifications: payloads,
            })
            .send()
            .await?;

        let body = handle_response(response).await?;
        BulkDispatchResponse::from_value(body)
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))
    }
}
