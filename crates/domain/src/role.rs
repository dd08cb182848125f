//! # ロール
//!
//! ロール単位のアラート送信で、宛先ユーザーを絞り込むためのロール名。

define_validated_string! {
    /// ロール名
    pub struct RoleName {
        label: "ロール名",
        max_length: 100,
    }
}

impl RoleName {
    /// ロール指定がない場合のアラート宛先ロール
    pub const CREDIT_OFFICER_SUPERIOR: &'static str = "sy_credit_officer_superior";

    /// ロール指定がない場合に使うロール一覧を返す
    pub fn default_alert_roles() -> Vec<RoleName> {
        vec![Self(Self::CREDIT_OFFICER_SUPERIOR.to_string())]
    }
}
