//! FakeStore-style REST catalog client.
//!
//! Endpoints, relative to the configured base URL:
//! `GET /`, `GET /{id}`, `GET /category/{name}`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::{CatalogClient, CatalogError, products_from_payload};
use crate::{config::CatalogConfig, models::Product};

#[derive(Clone)]
pub struct HttpCatalogClient {
    inner: Arc<HttpCatalogClientInner>,
}

struct HttpCatalogClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpCatalogClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_string(),
            }),
        })
    }

    async fn get_json(&self, url: &str) -> Result<Option<serde_json::Value>, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "catalog returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        // FakeStore answers unknown ids with `200` and an empty body.
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }

        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| CatalogError::InvalidPayload(e.to_string()))
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    #[instrument(skip(self))]
    async fn fetch_by_id(&self, id: i64) -> Result<Product, CatalogError> {
        let url = format!("{}/{id}", self.inner.base_url);
        match self.get_json(&url).await? {
            Some(value) => Product::from_payload(value),
            None => Err(CatalogError::NotFound(id)),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        match self.get_json(&self.inner.base_url).await? {
            Some(value) => products_from_payload(value),
            None => Err(CatalogError::InvalidPayload("empty product list body".into())),
        }
    }

    #[instrument(skip(self))]
    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let mut url = reqwest::Url::parse(&self.inner.base_url)
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport("catalog URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(["category", category]);

        match self.get_json(url.as_str()).await? {
            Some(value) => products_from_payload(value),
            None => Ok(Vec::new()),
        }
    }
}
