use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const LANG_COOKIE: &str = "lang";
pub const LANG_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    Tr,
    En,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::De, Locale::Tr, Locale::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::Tr => "tr",
            Locale::En => "en",
        }
    }

    /// Locale from an optional cookie value; anything unsupported is the default.
    pub fn from_cookie(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::De => &DE,
            Locale::Tr => &TR,
            Locale::En => &EN,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Locale::De),
            "tr" => Ok(Locale::Tr),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

static DE: LazyLock<Messages> = LazyLock::new(|| Messages::parse(include_str!("../messages/de.json")));
static TR: LazyLock<Messages> = LazyLock::new(|| Messages::parse(include_str!("../messages/tr.json")));
static EN: LazyLock<Messages> = LazyLock::new(|| Messages::parse(include_str!("../messages/en.json")));

/// Namespaced string dictionary: `{ "<ns>": { "<key>": "<text>" } }`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Messages {
    root: Map<String, Value>,
}

impl Messages {
    /// Broken dictionaries load as empty so lookups fall back to keys.
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(root)) => Self { root },
            Ok(_) => {
                tracing::warn!("message dictionary is not an object");
                Self::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "message dictionary failed to parse");
                Self::default()
            }
        }
    }

    pub fn get(&self, ns: &str, key: &str) -> Option<&str> {
        self.root.get(ns)?.get(key)?.as_str()
    }

    pub fn t(&self, ns: &str, key: &str) -> String {
        self.get(ns, key).unwrap_or(key).to_string()
    }

    pub fn t_or(&self, ns: &str, key: &str, fallback: &str) -> String {
        self.get(ns, key).unwrap_or(fallback).to_string()
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_locale_cookie_is_default() {
        assert_eq!(Locale::from_cookie(Some("fr")), Locale::De);
        assert_eq!(Locale::from_cookie(None), Locale::De);
        assert_eq!(Locale::from_cookie(Some("EN")), Locale::En);
    }

    #[test]
    fn missing_keys_return_the_key() {
        let messages = Locale::En.messages();
        assert_eq!(messages.t("common", "sort"), "Sort");
        assert_eq!(messages.t("common", "no_such_key"), "no_such_key");
        assert_eq!(messages.t("nope", "x"), "x");
        assert_eq!(messages.t_or("nope", "x", "fallback"), "fallback");
    }

    #[test]
    fn broken_dictionary_is_empty() {
        let messages = Messages::parse("{ not json");
        assert_eq!(messages.t("common", "sort"), "sort");
        assert_eq!(Messages::parse("[1,2]").as_value(), serde_json::json!({}));
    }

    #[test]
    fn every_locale_has_the_product_title() {
        for locale in Locale::ALL {
            assert!(locale.messages().get("products_page", "title").is_some());
        }
    }
}
