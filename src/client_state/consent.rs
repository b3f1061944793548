use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{StateStore, load_json, save_json};

pub const CONSENT_STORAGE_KEY: &str = "cookie-consent-v1";
pub const CONSENT_COOKIE: &str = "cookie_consent";
pub const CONSENT_COOKIE_MAX_AGE: i64 = 60 * 60 * 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentState {
    pub analytics: bool,
    pub marketing: bool,
    /// Milliseconds since the epoch, as stored by the browser.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
}

impl ConsentState {
    /// "Accept all" enables analytics only; marketing cookies are never set.
    pub fn accept_all(now: DateTime<Utc>) -> Self {
        Self {
            analytics: true,
            marketing: false,
            date: now,
        }
    }

    pub fn essential_only(now: DateTime<Utc>) -> Self {
        Self {
            analytics: false,
            marketing: false,
            date: now,
        }
    }

    pub fn load(store: &dyn StateStore) -> Option<Self> {
        load_json(store, CONSENT_STORAGE_KEY)
    }

    /// The banner is shown until a choice has been stored.
    pub fn needs_prompt(store: &dyn StateStore) -> bool {
        Self::load(store).is_none()
    }

    pub fn save(&self, store: &mut dyn StateStore) {
        save_json(store, CONSENT_STORAGE_KEY, self);
    }

    pub fn cookie_value(&self) -> &'static str {
        if self.analytics || self.marketing {
            "all"
        } else {
            "essential"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_state::MemoryStore;

    #[test]
    fn prompt_until_choice_is_stored() {
        let mut store = MemoryStore::new();
        assert!(ConsentState::needs_prompt(&store));
        ConsentState::essential_only(Utc::now()).save(&mut store);
        assert!(!ConsentState::needs_prompt(&store));
    }

    #[test]
    fn accept_all_leaves_marketing_off() {
        let consent = ConsentState::accept_all(Utc::now());
        assert!(consent.analytics);
        assert!(!consent.marketing);
        assert_eq!(consent.cookie_value(), "all");
        assert_eq!(ConsentState::essential_only(Utc::now()).cookie_value(), "essential");
    }

    #[test]
    fn stored_form_uses_millisecond_dates() {
        let mut store = MemoryStore::new();
        store.set(
            CONSENT_STORAGE_KEY,
            r#"{"analytics":true,"marketing":false,"date":1700000000000}"#.to_string(),
        );
        let consent = ConsentState::load(&store).expect("consent");
        assert!(consent.analytics);
        assert_eq!(consent.date.timestamp(), 1_700_000_000);
    }
}
