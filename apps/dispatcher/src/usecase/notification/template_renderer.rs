//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで HTML 本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: 既定テンプレート `mail/global` はバイナリに埋め込まれる
//! - **追加テンプレート**: ディレクトリを指定すると `**/*.html` を読み込む。同名なら埋め込みより優先
//! - **ロケール別テンプレート**: `{path}.{locale}.html` があれば `{path}.html` より優先
//! - **ロケールの受け渡し**: アクティブなロケールをコンテキストの `locale` として渡す

use std::path::Path;

use herald_domain::{locale::Locale, notification::NotificationError};
use serde_json::{Map, Value};
use tera::{Context, Tera};

/// 既定のテンプレートパス
pub const DEFAULT_TEMPLATE_PATH: &str = "mail/global";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 埋め込みテンプレートのみでレンダラーを作成
    pub fn new() -> Result<Self, NotificationError> {
        Ok(Self {
            engine: embedded_templates()?,
        })
    }

    /// 埋め込みテンプレートに加えて、ディレクトリ内のテンプレートを読み込む
    pub fn with_template_dir(dir: &Path) -> Result<Self, NotificationError> {
        let glob = format!("{}/**/*.html", dir.display());
        let mut engine =
            Tera::new(&glob).map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;
        engine
            .extend(&embedded_templates()?)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        tracing::debug!(
            template_dir = %dir.display(),
            templates = engine.get_template_names().count(),
            "通知テンプレートを読み込みました"
        );

        Ok(Self { engine })
    }

    /// テンプレートをレンダリングする
    ///
    /// # 引数
    ///
    /// - `path`: 拡張子なしのテンプレートパス（例: `mail/global`）
    /// - `payload`: テンプレートに渡す値
    /// - `locale`: アクティブなロケール
    pub fn render(
        &self,
        path: &str,
        payload: &Map<String, Value>,
        locale: &Locale,
    ) -> Result<String, NotificationError> {
        let name = self.resolve_name(path, locale)?;

        let mut context = Context::from_value(Value::Object(payload.clone()))
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;
        context.insert("locale", locale.as_str());

        self.engine
            .render(&name, &context)
            .map_err(|e| NotificationError::TemplateFailed(render_error_chain(&e)))
    }

    fn resolve_name(&self, path: &str, locale: &Locale) -> Result<String, NotificationError> {
        let base = path.strip_suffix(".html").unwrap_or(path);
        let candidates = [format!("{base}.{}.html", locale.as_str()), format!("{base}.html")];

        candidates
            .into_iter()
            .find(|name| self.has_template(name))
            .ok_or_else(|| NotificationError::TemplateNotFound(format!("{base}.html")))
    }

    fn has_template(&self, name: &str) -> bool {
        self.engine.get_template_names().any(|n| n == name)
    }
}

fn embedded_templates() -> Result<Tera, NotificationError> {
    let mut engine = Tera::default();
    engine
        .add_raw_templates(vec![(
            "mail/global.html",
            include_str!("../../../templates/mail/global.html"),
        )])
        .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;
    Ok(engine)
}

/// tera のエラーは原因がネストするため、連結して 1 行にする
fn render_error_chain(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    message
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn locale(value: &str) -> Locale {
        Locale::new(value).unwrap()
    }

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("オブジェクトを渡すこと"),
        }
    }

    #[test]
    fn test_newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn test_既定テンプレートにペイロードとロケールが反映される() {
        let renderer = TemplateRenderer::new().unwrap();

        let html = renderer
            .render(
                DEFAULT_TEMPLATE_PATH,
                &payload(json!({"title": "Welcome", "content": "Your account is ready"})),
                &locale("fr"),
            )
            .unwrap();

        assert!(html.contains(r#"<html lang="fr">"#));
        assert!(html.contains("Welcome"));
        assert!(html.contains("Your account is ready"));
    }

    #[test]
    fn test_htmlはエスケープされる() {
        let renderer = TemplateRenderer::new().unwrap();

        let html = renderer
            .render(
                DEFAULT_TEMPLATE_PATH,
                &payload(json!({"content": "<script>alert(1)</script>"})),
                &locale("en"),
            )
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_拡張子付きのパスも受け付ける() {
        let renderer = TemplateRenderer::new().unwrap();

        let result = renderer.render(
            "mail/global.html",
            &payload(json!({"title": "x"})),
            &locale("en"),
        );

        assert!(result.is_ok());
    }

    #[test]
    fn test_存在しないテンプレートはtemplate_not_foundを返す() {
        let renderer = TemplateRenderer::new().unwrap();

        let result = renderer.render("mail/missing", &Map::new(), &locale("en"));

        match result {
            Err(NotificationError::TemplateNotFound(name)) => assert_eq!(name, "mail/missing.html"),
            other => panic!("TemplateNotFound を期待したが {other:?} を受け取った"),
        }
    }

    #[test]
    fn test_ディレクトリのテンプレートとロケール別テンプレートを優先する() {
        let dir = std::env::temp_dir().join(format!("herald-templates-{}", std::process::id()));
        fs::create_dir_all(dir.join("mail")).unwrap();
        fs::write(dir.join("mail/welcome.html"), "Hello {{ name }}").unwrap();
        fs::write(dir.join("mail/welcome.fr.html"), "Bonjour {{ name }}").unwrap();

        let renderer = TemplateRenderer::with_template_dir(&dir).unwrap();
        let values = payload(json!({"name": "Ana"}));

        let fr = renderer.render("mail/welcome", &values, &locale("fr")).unwrap();
        let en = renderer.render("mail/welcome", &values, &locale("en")).unwrap();
        let global = renderer.render(DEFAULT_TEMPLATE_PATH, &values, &locale("en"));

        fs::remove_dir_all(&dir).ok();

        assert_eq!(fr, "Bonjour Ana");
        assert_eq!(en, "Hello Ana");
        assert!(global.is_ok(), "埋め込みテンプレートも利用できること");
    }
}
