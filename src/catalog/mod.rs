//! Access to the external product catalog.
//!
//! [`CatalogClient`] is the raw, uncached contract to the catalog API.
//! [`CatalogCache`] wraps a client and is the only component that calls it.

pub mod cache;
pub mod http;

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{Product, Rating};

pub use cache::CatalogCache;
pub use http::HttpCatalogClient;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product {0} not found in catalog")]
    NotFound(i64),

    #[error("catalog returned status {0}")]
    Status(u16),

    #[error("catalog request timed out")]
    Timeout,

    #[error("catalog transport error: {0}")]
    Transport(String),

    #[error("invalid catalog payload: {0}")]
    InvalidPayload(String),
}

impl CatalogError {
    /// `true` for every failure other than a confirmed missing product.
    pub fn is_transport(&self) -> bool {
        !matches!(self, CatalogError::NotFound(_))
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else {
            CatalogError::Transport(err.to_string())
        }
    }
}

/// One bounded round trip per call. No retries, no caching.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_by_id(&self, id: i64) -> Result<Product, CatalogError>;

    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError>;

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct RawRating {
    rate: f64,
    count: i64,
}

/// Wire shape of a catalog item. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawProduct {
    id: i64,
    title: String,
    description: String,
    price: serde_json::Number,
    category: String,
    image: String,
    rating: RawRating,
}

impl Product {
    /// Validate an untyped catalog payload into a [`Product`].
    ///
    /// Missing fields, a non-decimal price or a negative price are rejected as
    /// [`CatalogError::InvalidPayload`]; a partially populated product is never
    /// produced.
    pub fn from_payload(value: serde_json::Value) -> Result<Self, CatalogError> {
        let raw: RawProduct = serde_json::from_value(value)
            .map_err(|e| CatalogError::InvalidPayload(e.to_string()))?;

        let price = Decimal::from_str(&raw.price.to_string())
            .or_else(|_| Decimal::from_scientific(&raw.price.to_string()))
            .map_err(|e| CatalogError::InvalidPayload(format!("price: {e}")))?;
        if price.is_sign_negative() {
            return Err(CatalogError::InvalidPayload(format!(
                "negative price for product {}",
                raw.id
            )));
        }

        Ok(Product {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            price,
            category: raw.category,
            image: raw.image,
            rating: Rating {
                rate: raw.rating.rate,
                count: raw.rating.count,
            },
        })
    }

    /// Case-insensitive match against title, description or category.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
    }
}

/// Parse a JSON array payload, failing the whole batch on any invalid item.
pub(crate) fn products_from_payload(value: serde_json::Value) -> Result<Vec<Product>, CatalogError> {
    match value {
        serde_json::Value::Array(items) => items.into_iter().map(Product::from_payload).collect(),
        other => Err(CatalogError::InvalidPayload(format!(
            "expected an array of products, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn payload() -> serde_json::Value {
        json!({
            "id": 1,
            "title": "Fjallraven - Foldsack No. 1 Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 },
            "stock": 4
        })
    }

    #[test]
    fn parses_catalog_item_and_drops_unknown_fields() {
        let product = Product::from_payload(payload()).unwrap();
        assert_eq!(product.id, 1);
        assert_eq!(product.price, Decimal::new(10995, 2));
        assert_eq!(product.category, "men's clothing");
        assert_eq!(product.rating.count, 120);
    }

    #[test]
    fn missing_required_field_is_invalid_payload() {
        let mut value = payload();
        value.as_object_mut().unwrap().remove("title");
        let err = Product::from_payload(value).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidPayload(_)));
        assert!(err.is_transport());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut value = payload();
        value["price"] = json!(-1.5);
        assert!(matches!(
            Product::from_payload(value),
            Err(CatalogError::InvalidPayload(_))
        ));
    }

    #[test]
    fn integer_price_is_accepted() {
        let mut value = payload();
        value["price"] = json!(20);
        assert_eq!(Product::from_payload(value).unwrap().price, Decimal::new(20, 0));
    }

    #[test]
    fn batch_fails_when_payload_is_not_an_array() {
        let err = products_from_payload(json!({ "items": [] })).unwrap_err();
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn text_match_is_case_insensitive_across_fields() {
        let product = Product::from_payload(payload()).unwrap();
        assert!(product.matches_text("FOLDSACK"));
        assert!(product.matches_text("everyday"));
        assert!(product.matches_text("Men's"));
        assert!(!product.matches_text("jewelery"));
    }

    #[test]
    fn not_found_is_not_a_transport_failure() {
        assert!(!CatalogError::NotFound(3).is_transport());
        assert!(CatalogError::Timeout.is_transport());
    }
}
