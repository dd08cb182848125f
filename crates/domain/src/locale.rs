//! # ロケール
//!
//! 通知本文のレンダリングに使う表示ロケールを扱う。
//!
//! ## 設計方針
//!
//! - **明示的なコンテキスト**: アクティブなロケールはプロセス全体の状態ではなく、
//!   呼び出し元が所有する [`LocaleContext`] が保持する。並行リクエスト間で
//!   ロケールが漏れることはない
//! - **スコープによる復元**: [`LocaleContext::scoped`] が返す [`LocaleScope`] は
//!   ドロップ時に開始時のロケールへ戻す。`?` による早期リターンを含む
//!   すべての経路で復元される
//! - **冗長な再アクティブ化を避ける**: 復元は現在のロケールと異なる場合のみ行う
//!
//! ## 使用例
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use herald_domain::locale::{Locale, LocaleContext};
//!
//! let mut context = LocaleContext::new(Locale::new("en")?);
//! {
//!     let scope = context.scoped(Some(Locale::new("fr")?));
//!     assert_eq!(scope.active().as_str(), "fr");
//! }
//! assert_eq!(context.active().as_str(), "en");
//! # Ok(())
//! # }
//! ```

use std::ops::Deref;

define_validated_string! {
    /// 表示ロケール（例: `en`, `fr`, `pt-BR`）
    pub struct Locale {
        label: "ロケール",
        max_length: 35,
    }
}

/// アクティブなロケールを保持するコンテキスト
///
/// 1 リクエスト（または 1 呼び出し元）につき 1 つ作成し、`&mut` で引き回す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleContext {
    active: Locale,
}

impl LocaleContext {
    pub fn new(initial: Locale) -> Self {
        Self { active: initial }
    }

    /// 現在アクティブなロケール
    pub fn active(&self) -> &Locale {
        &self.active
    }

    /// ロケールをアクティブにする
    pub fn activate(&mut self, locale: Locale) {
        self.active = locale;
    }

    /// 一時的にロケールを切り替えるスコープを開く
    ///
    /// `locale` が `None` の場合は何も切り替えない（現在のロケールのまま）。
    /// 返されたスコープのドロップ時、開始時のロケールと異なっていれば復元する。
    pub fn scoped(&mut self, locale: Option<Locale>) -> LocaleScope<'_> {
        let initial = self.active.clone();
        if let Some(locale) = locale {
            self.activate(locale);
        }
        LocaleScope {
            context: self,
            initial,
        }
    }
}

/// ロケール切り替えのスコープ
///
/// [`LocaleContext`] への `Deref` を提供し、スコープ中のロケールを参照できる。
#[must_use = "スコープはドロップされた時点でロケールを復元する"]
pub struct LocaleScope<'a> {
    context: &'a mut LocaleContext,
    initial: Locale,
}

impl Deref for LocaleScope<'_> {
    type Target = LocaleContext;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl Drop for LocaleScope<'_> {
    fn drop(&mut self) {
        if self.context.active != self.initial {
            self.context.activate(self.initial.clone());
        }
    }
}
