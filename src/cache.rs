//! Short-lived cache for public catalog payloads.
//!
//! Keys start with the storefront page path the payload belongs to
//! (`/`, `/products`, `/products/<slug>`, `/category/<slug>`), so on-demand
//! revalidation can drop everything under a path. Paths are compared by whole
//! segments: `/category` covers `/category/nuts` but not `/categories`.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct CatalogCache {
    inner: Cache<String, Value>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(1000)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    pub fn key(page_path: &str, variant: &str) -> String {
        format!("{page_path}|{variant}")
    }

    /// Returns the cached payload or runs `load` and stores its JSON form.
    pub async fn get_or_load<T, F, Fut>(&self, key: String, load: F) -> AppResult<Value>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(hit) = self.inner.get(&key).await {
            debug!(key = %key, "catalog cache hit");
            return Ok(hit);
        }
        let value = serde_json::to_value(load().await?)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        self.inner.insert(key, value.clone()).await;
        Ok(value)
    }

    /// Drops every entry whose page path is `path` or lies below it. Returns how many were removed.
    pub async fn invalidate_prefix(&self, path: &str) -> usize {
        self.invalidate_where(path, |page| path_matches(page, path)).await
    }

    /// Drops the entries of exactly one page path, leaving pages below it alone.
    pub async fn invalidate_page(&self, path: &str) -> usize {
        self.invalidate_where(path, |page| page == path).await
    }

    async fn invalidate_where(&self, path: &str, matches: impl Fn(&str) -> bool) -> usize {
        let stale: Vec<String> = self
            .inner
            .iter()
            .filter(|(key, _)| matches(page_of(key)))
            .map(|(key, _)| key.as_ref().clone())
            .collect();
        for key in &stale {
            self.inner.invalidate(key).await;
        }
        self.inner.run_pending_tasks().await;
        debug!(path, removed = stale.len(), "catalog cache invalidated");
        stale.len()
    }

    pub async fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    pub async fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }
}

fn page_of(key: &str) -> &str {
    key.split_once('|').map_or(key, |(page, _)| page)
}

/// `page` equals `prefix` or sits under it on a `/` boundary.
fn path_matches(page: &str, prefix: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return page.starts_with('/');
    }
    match page.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn loads_once_then_hits() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        let key = CatalogCache::key("/products", "sort=name|de");
        let first = cache
            .get_or_load(key.clone(), || async { Ok(json!({"n": 1})) })
            .await
            .expect("load");
        let second = cache
            .get_or_load(key, || async { Ok(json!({"n": 2})) })
            .await
            .expect("hit");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn load_errors_are_not_cached() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        let key = CatalogCache::key("/", "de");
        let failed = cache
            .get_or_load(key.clone(), || async { Err::<Value, _>(AppError::NotFound) })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn prefix_invalidation_keeps_other_paths() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        for path in ["/products", "/products/walnut", "/category/nuts"] {
            cache
                .get_or_load(CatalogCache::key(path, "de"), || async { Ok(json!(path)) })
                .await
                .expect("load");
        }
        assert_eq!(cache.invalidate_prefix("/products").await, 2);
        assert_eq!(cache.entry_count().await, 1);
        cache.invalidate_all().await;
        assert_eq!(cache.entry_count().await, 0);
    }

    #[test]
    fn paths_match_on_segments() {
        assert!(path_matches("/category", "/category"));
        assert!(path_matches("/category/nuts", "/category"));
        assert!(path_matches("/category/nuts", "/category/"));
        assert!(!path_matches("/categories", "/category"));
        assert!(!path_matches("/products-old", "/products"));
        assert!(path_matches("/categories", "/"));
    }

    #[tokio::test]
    async fn category_prefix_leaves_category_list() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        for path in ["/categories", "/category/nuts", "/category/seeds"] {
            cache
                .get_or_load(CatalogCache::key(path, "all"), || async { Ok(json!(path)) })
                .await
                .expect("load");
        }
        assert_eq!(cache.invalidate_prefix("/category").await, 2);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn page_invalidation_is_exact() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        for (path, variant) in [("/", "de"), ("/", "tr"), ("/products", "de"), ("/products/walnut", "de")] {
            cache
                .get_or_load(CatalogCache::key(path, variant), || async { Ok(json!(path)) })
                .await
                .expect("load");
        }
        assert_eq!(cache.invalidate_page("/").await, 2);
        assert_eq!(cache.invalidate_page("/products").await, 1);
        assert_eq!(cache.entry_count().await, 1);
    }
}
