//! Visitor-side state containers (cart, cookie consent, like flags).
//!
//! Each container is a plain value with explicit operations. Persistence goes
//! through [`StateStore`], so browser storage, a cookie jar or a server
//! session can back the same logic.

pub mod cart;
pub mod consent;
pub mod likes;

use std::collections::HashMap;

use serde::{Serialize, de::DeserializeOwned};

pub use cart::{Cart, CartItem};
pub use consent::ConsentState;
pub use likes::LikeLedger;

/// String key-value persistence, the shape of browser local storage.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Unreadable or missing values are treated as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::debug!(key, error = %err, "discarding unreadable stored state");
            None
        }
    }
}

pub fn save_json<T: Serialize>(store: &mut dyn StateStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => store.set(key, raw),
        Err(err) => tracing::warn!(key, error = %err, "failed to serialize state"),
    }
}
