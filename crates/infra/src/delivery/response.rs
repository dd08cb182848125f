//! 配信サービスレスポンスの共通ハンドリング

use serde_json::Value;

use super::error::DeliveryError;

/// 配信サービスレスポンスの共通ハンドリング
///
/// 成功時はレスポンスボディを JSON として返し、
/// エラー時はステータスコードに応じた `DeliveryError` を返す。
///
/// 2xx でボディが JSON でない場合、配信サービスは通知を受け付けているので
/// 通信エラーではなく `InvalidResponse` とする。
pub(super) async fn handle_response(response: reqwest::Response) -> Result<Value, DeliveryError> {
    let status = response.status();

    if status.is_success() {
        let body = response.text().await?;
        return serde_json::from_str(&body).map_err(|e| {
            DeliveryError::InvalidResponse(format!("ステータス {}: {e}", status.as_u16()))
        });
    }

    let body = response.text().await.unwrap_or_default();

    let error = match status {
        reqwest::StatusCode::BAD_REQUEST => DeliveryError::Rejected(body),
        _ => DeliveryError::Unexpected {
            status: status.as_u16(),
            body,
        },
    };

    Err(error)
}
