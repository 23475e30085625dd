#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use catalog_favorites_api::{
    catalog::{CatalogCache, CatalogClient, CatalogError},
    config::CatalogConfig,
    db::{create_orm_conn, run_migrations},
    entity::customers::ActiveModel as CustomerActive,
    middleware::auth::{AuthCustomer, Claims},
    models::{Product, Rating},
    state::AppState,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};

pub const JWT_SECRET: &str = "test-secret";

/// In-process catalog. Unknown ids are `NotFound`.
#[derive(Default)]
pub struct FakeCatalog {
    products: Mutex<HashMap<i64, Product>>,
    pub by_id_calls: AtomicUsize,
    pub all_calls: AtomicUsize,
}

impl FakeCatalog {
    pub fn with(products: Vec<Product>) -> Arc<Self> {
        let fake = Self::default();
        {
            let mut map = fake.products.lock().unwrap();
            for product in products {
                map.insert(product.id, product);
            }
        }
        Arc::new(fake)
    }

    pub fn remove(&self, id: i64) {
        self.products.lock().unwrap().remove(&id);
    }

    pub fn by_id_calls(&self) -> usize {
        self.by_id_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_by_id(&self, id: i64) -> Result<Product, CatalogError> {
        self.by_id_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.products
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    async fn fetch_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.all_calls.fetch_add(1, Ordering::SeqCst);
        let mut products: Vec<Product> = self.products.lock().unwrap().values().cloned().collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<Product>, CatalogError> {
        let mut products: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        products.sort_by_key(|p| p.id);
        Ok(products)
    }
}

pub fn product(id: i64, title: &str, cents: i64) -> Product {
    Product {
        id,
        title: title.to_string(),
        description: format!("{title} description"),
        price: Decimal::new(cents, 2),
        category: "electronics".to_string(),
        image: format!("https://example.test/img/{id}.png"),
        rating: Rating {
            rate: 4.1,
            count: 259,
        },
    }
}

pub fn default_catalog() -> Arc<FakeCatalog> {
    FakeCatalog::with(vec![
        product(7, "Test Product", 1999),
        product(1, "Backpack", 10995),
        product(2, "Slim Fit T-Shirt", 2230),
        product(3, "Cotton Jacket", 5599),
    ])
}

pub async fn setup_state(catalog: Arc<FakeCatalog>) -> anyhow::Result<AppState> {
    state_for("sqlite::memory:", catalog).await
}

/// Postgres URL for tests that need more than one connection, if configured.
pub fn postgres_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if url.starts_with("postgres") => Some(url),
        _ => {
            eprintln!("Skipping test: set TEST_DATABASE_URL to a Postgres database to run it.");
            None
        }
    }
}

pub async fn state_for(database_url: &str, catalog: Arc<FakeCatalog>) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let client: Arc<dyn CatalogClient> = catalog;
    let config = CatalogConfig {
        timeout: Duration::from_secs(2),
        ..CatalogConfig::default()
    };

    Ok(AppState {
        orm,
        catalog: CatalogCache::new(client, &config),
        jwt_secret: Arc::from(JWT_SECRET),
    })
}

pub async fn create_customer(state: &AppState, name: &str, email: &str) -> anyhow::Result<AuthCustomer> {
    let now = Utc::now();
    let customer = CustomerActive {
        id: NotSet,
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthCustomer {
        customer_id: customer.id,
    })
}

/// Email unique across runs against a shared database.
pub fn unique_email(name: &str) -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{name}-{nanos}@example.com")
}

pub fn token_for(customer: &AuthCustomer) -> String {
    let claims = Claims {
        sub: customer.customer_id.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
