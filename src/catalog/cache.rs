//! Read-through catalog cache.
//!
//! Entries expire a fixed TTL after they were loaded. Concurrent misses on the
//! same key share one loader call (`moka`'s `try_get_with`); misses on
//! different keys proceed independently. A failed load is never stored, so the
//! next read retries the catalog.

use std::{fmt, future::Future, sync::Arc, time::Duration};

use moka::future::Cache;

use super::{CatalogClient, CatalogError};
use crate::{config::CatalogConfig, models::Product};

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(i64),
    All,
    Category(String),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Product(id) => write!(f, "product:{id}"),
            CacheKey::All => f.write_str("products:all"),
            CacheKey::Category(name) => write!(f, "products:category:{name}"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Arc<Product>),
    Products(Arc<Vec<Product>>),
}

#[derive(Clone)]
pub struct CatalogCache {
    inner: Arc<CatalogCacheInner>,
}

struct CatalogCacheInner {
    client: Arc<dyn CatalogClient>,
    entries: Cache<CacheKey, CacheValue>,
    fetch_timeout: Duration,
}

impl CatalogCache {
    pub fn new(client: Arc<dyn CatalogClient>, config: &CatalogConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Self {
            inner: Arc::new(CatalogCacheInner {
                client,
                entries,
                fetch_timeout: config.timeout,
            }),
        }
    }

    /// Return the live entry for `key`, or run `loader` to fill it.
    ///
    /// `loader` runs at most once per key for any set of concurrent callers,
    /// and all of them observe its result. A loader that fails or exceeds the
    /// fetch timeout yields `None` and leaves the key empty.
    pub async fn get<F>(&self, key: CacheKey, loader: F) -> Option<CacheValue>
    where
        F: Future<Output = Result<CacheValue, CatalogError>>,
    {
        let timeout = self.inner.fetch_timeout;
        let label = key.to_string();
        let init = async move {
            tracing::debug!(key = %label, "catalog cache miss");
            match tokio::time::timeout(timeout, loader).await {
                Ok(result) => result,
                Err(_) => Err(CatalogError::Timeout),
            }
        };

        match self.inner.entries.try_get_with(key.clone(), init).await {
            Ok(value) => Some(value),
            Err(err) if err.is_transport() => {
                tracing::warn!(key = %key, error = %err, "catalog fetch failed");
                None
            }
            Err(err) => {
                tracing::debug!(key = %key, error = %err, "catalog lookup found nothing");
                None
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Product> {
        let client = Arc::clone(&self.inner.client);
        let loader = async move {
            client
                .fetch_by_id(id)
                .await
                .map(|product| CacheValue::Product(Arc::new(product)))
        };

        match self.get(CacheKey::Product(id), loader).await {
            Some(CacheValue::Product(product)) => Some(product.as_ref().clone()),
            _ => None,
        }
    }

    pub async fn get_all(&self) -> Vec<Product> {
        self.all_snapshot().await.as_ref().clone()
    }

    pub async fn get_by_category(&self, category: &str) -> Vec<Product> {
        let client = Arc::clone(&self.inner.client);
        let name = category.to_string();
        let loader = async move {
            client
                .fetch_by_category(&name)
                .await
                .map(|products| CacheValue::Products(Arc::new(products)))
        };

        match self
            .get(CacheKey::Category(category.to_string()), loader)
            .await
        {
            Some(CacheValue::Products(products)) => products.as_ref().clone(),
            _ => Vec::new(),
        }
    }

    /// Filter the full-catalog snapshot; only products in it can match.
    pub async fn search_by_text(&self, query: &str) -> Vec<Product> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.all_snapshot()
            .await
            .iter()
            .filter(|product| product.matches_text(query))
            .cloned()
            .collect()
    }

    /// Products from the full-catalog snapshot whose id is in `ids`, in
    /// catalog order.
    pub async fn filter_by_ids(&self, ids: &[i64]) -> Vec<Product> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.all_snapshot()
            .await
            .iter()
            .filter(|product| ids.contains(&product.id))
            .cloned()
            .collect()
    }

    pub fn invalidate_all(&self) {
        self.inner.entries.invalidate_all();
    }

    async fn all_snapshot(&self) -> Arc<Vec<Product>> {
        let client = Arc::clone(&self.inner.client);
        let loader = async move {
            client
                .fetch_all()
                .await
                .map(|products| CacheValue::Products(Arc::new(products)))
        };

        match self.get(CacheKey::All, loader).await {
            Some(CacheValue::Products(products)) => products,
            _ => Arc::new(Vec::new()),
        }
    }
}
