//! 値オブジェクト定義用の宣言型マクロ
//!
//! ID 型と文字列の値オブジェクトは、どれも同じ形の Newtype になる。
//! 手書きの重複を避けるため、ここで生成する。

/// `Uuid` をラップする ID 型を定義する
///
/// 生成される API は `new()`（UUID v7）、`from_uuid()`、`as_uuid()` と `Default`。
/// データベースから読み込んだ値は `from_uuid()` で復元する。
///
/// ```rust
/// use herald_domain::user::UserId;
///
/// let id = UserId::new();
/// assert_eq!(UserId::from_uuid(*id.as_uuid()), id);
/// ```
macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $vis:vis struct $Name:ident;) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(transparent)]
        $vis struct $Name(uuid::Uuid);

        impl $Name {
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $Name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

/// 前後の空白を除いた、空でない長さ制限付きの文字列型を定義する
///
/// `pii: true` を付けた型は `Debug` で値を出さず、`Display` も持たない。
/// ログに宛先の電話番号などが漏れないようにするため。
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use herald_domain::user::PhoneNumber;
///
/// let phone = PhoneNumber::new("  +33 6 12 34 56 78 ")?;
/// assert_eq!(phone.as_str(), "+33 6 12 34 56 78");
/// assert!(!format!("{phone:?}").contains("+33"));
/// # Ok(())
/// # }
/// ```
macro_rules! define_validated_string {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max:expr,
            pii: true $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        $vis struct $Name(String);

        impl std::fmt::Debug for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}(***)", stringify!($Name))
            }
        }

        define_validated_string!(@body $Name, $label, $max);
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident {
            label: $label:expr,
            max_length: $max:expr $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize,
            derive_more::Display,
        )]
        #[display("{_0}")]
        #[serde(try_from = "String", into = "String")]
        $vis struct $Name(String);

        define_validated_string!(@body $Name, $label, $max);
    };
    (@body $Name:ident, $label:expr, $max:expr) => {
        impl $Name {
            pub fn new(value: impl Into<String>) -> Result<Self, $crate::DomainError> {
                let value = value.into();
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err($crate::DomainError::Validation(format!("{}が空です", $label)));
                }
                if trimmed.chars().count() > $max {
                    return Err($crate::DomainError::Validation(format!(
                        "{}が長すぎます（最大 {} 文字）",
                        $label, $max
                    )));
                }
                Ok(Self(trimmed.to_owned()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $Name {
            type Error = $crate::DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$Name> for String {
            fn from(value: $Name) -> Self {
                value.0
            }
        }
    };
}
