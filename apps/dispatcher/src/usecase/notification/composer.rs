//! # ペイロードコンポーザー
//!
//! 通知リクエストから配信サービスに送るペイロードを組み立てる。
//!
//! 本文は次の優先順位で決まる:
//!
//! 1. HTML テンプレートのペイロードが空でなければ、テンプレートをアクティブなロケールでレンダリング
//! 2. テキスト本文が空でなければ、そのテキスト
//! 3. それ以外は生の `body` を文字列化したもの
//!
//! 宛先の妥当性は検証しない。

use std::sync::Arc;

use herald_domain::{
    locale::LocaleContext,
    notification::{NotificationError, NotificationRequest, WirePayload, stringify_value},
};

use super::template_renderer::{DEFAULT_TEMPLATE_PATH, TemplateRenderer};

/// ペイロードコンポーザー
pub struct PayloadComposer {
    renderer: Arc<TemplateRenderer>,
}

impl PayloadComposer {
    pub fn new(renderer: Arc<TemplateRenderer>) -> Self {
        Self { renderer }
    }

    /// 通知リクエストからペイロードを組み立てる
    pub fn compose(
        &self,
        request: &NotificationRequest,
        context: &LocaleContext,
    ) -> Result<WirePayload, NotificationError> {
        let html = &request.template.html;

        let body = if !html.payload.is_empty() {
            let path = if html.path.is_empty() {
                DEFAULT_TEMPLATE_PATH
            } else {
                html.path.as_str()
            };
            self.renderer.render(path, &html.payload, context.active())?
        } else if !request.template.text.is_empty() {
            request.template.text.clone()
        } else {
            stringify_value(&request.body)
        };

        Ok(WirePayload {
            is_internal_recipient: request.internal,
            recipient:             request.recipient.clone(),
            delivery_method:       request.method,
            message_subject:       stringify_value(&request.subject),
            message_body:          body,
            sender:                Some(request.sender.clone()).filter(|s| !s.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use herald_domain::{locale::Locale, notification::DeliveryMethod};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Map, Value, json};

    use super::*;

    fn composer() -> PayloadComposer {
        PayloadComposer::new(Arc::new(TemplateRenderer::new().unwrap()))
    }

    fn context(locale: &str) -> LocaleContext {
        LocaleContext::new(Locale::new(locale).unwrap())
    }

    fn html_payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("オブジェクトを渡すこと"),
        }
    }

    #[test]
    fn test_テンプレートのペイロードがあればテキストより優先してレンダリングする() {
        let request = NotificationRequest::new("a@x.com")
            .with_text("plain")
            .with_html("", html_payload(json!({"title": "Rendered"})));

        let payload = composer().compose(&request, &context("en")).unwrap();

        assert!(payload.message_body.contains("Rendered"));
        assert!(payload.message_body.contains(r#"lang="en""#));
        assert!(!payload.message_body.contains("plain"));
    }

    #[test]
    fn test_アクティブなロケールでレンダリングする() {
        let request = NotificationRequest::new("a@x.com")
            .with_html("mail/global", html_payload(json!({"title": "t"})));

        let payload = composer().compose(&request, &context("pt-BR")).unwrap();

        assert!(payload.message_body.contains(r#"lang="pt-BR""#));
    }

    #[test]
    fn test_テンプレートがなければテキストを本文にする() {
        let request = NotificationRequest::new("a@x.com")
            .with_text("plain")
            .with_body("raw");

        let payload = composer().compose(&request, &context("en")).unwrap();

        assert_eq!(payload.message_body, "plain");
    }

    #[rstest]
    #[case(json!("raw"), "raw")]
    #[case(json!(null), "")]
    #[case(json!(12), "12")]
    #[case(json!({"k": "v"}), r#"{"k":"v"}"#)]
    fn test_テンプレートもテキストもなければ生の本文を文字列化する(
        #[case] body: Value,
        #[case] expected: &str,
    ) {
        let request = NotificationRequest::new("a@x.com").with_body(body);

        let payload = composer().compose(&request, &context("en")).unwrap();

        assert_eq!(payload.message_body, expected);
    }

    #[test]
    fn test_件名は文字列化される() {
        let request = NotificationRequest::new("a@x.com").with_subject(json!(["a", 1]));

        let payload = composer().compose(&request, &context("en")).unwrap();

        assert_eq!(payload.message_subject, r#"["a",1]"#);
    }

    #[test]
    fn test_送信者が空ならsenderを含めない() {
        let without = NotificationRequest::new("a@x.com");
        let with = NotificationRequest::new("a@x.com").with_sender("ops@x.com");

        let composer = composer();
        let without = composer.compose(&without, &context("en")).unwrap();
        let with = composer.compose(&with, &context("en")).unwrap();

        assert_eq!(without.sender, None);
        assert_eq!(with.sender.as_deref(), Some("ops@x.com"));
    }

    #[test]
    fn test_既定の配信方法はメールで内部フラグを引き継ぐ() {
        let request = NotificationRequest::new("+15550001")
            .with_method(DeliveryMethod::Sms)
            .internal();

        let default = composer()
            .compose(&NotificationRequest::new("a@x.com"), &context("en"))
            .unwrap();
        let sms = composer().compose(&request, &context("en")).unwrap();

        assert_eq!(default.delivery_method, DeliveryMethod::Email);
        assert!(!default.is_internal_recipient);
        assert_eq!(sms.delivery_method, DeliveryMethod::Sms);
        assert!(sms.is_internal_recipient);
    }

    #[test]
    fn test_宛先は検証しない() {
        let payload = composer()
            .compose(&NotificationRequest::new("not-an-address"), &context("en"))
            .unwrap();

        assert_eq!(payload.recipient, "not-an-address");
    }

    #[test]
    fn test_存在しないテンプレートはエラーになる() {
        let request = NotificationRequest::new("a@x.com")
            .with_html("mail/missing", html_payload(json!({"title": "t"})));

        let result = composer().compose(&request, &context("en"));

        assert!(matches!(result, Err(NotificationError::TemplateNotFound(_))));
    }
}
