use std::{env, time::Duration};

const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the product collection, e.g. `https://fakestoreapi.com/products`.
    pub url: String,
    pub timeout: Duration,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_CATALOG_URL.to_string(),
            timeout: Duration::from_secs(30),
            cache_ttl: Duration::from_secs(3600),
            cache_capacity: 1000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = database_url()?;
        let jwt_secret = required_var("JWT_SECRET")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            catalog: CatalogConfig::from_env(),
        })
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("CATALOG_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.url),
            timeout: secs_var("CATALOG_TIMEOUT_SECS").unwrap_or(defaults.timeout),
            cache_ttl: secs_var("CATALOG_CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl),
            cache_capacity: env::var("CATALOG_CACHE_CAPACITY")
                .ok()
                .and_then(|c| c.parse::<u64>().ok())
                .unwrap_or(defaults.cache_capacity),
        }
    }
}

/// `DATABASE_URL` alone, for tools that only touch the database.
pub fn database_url() -> anyhow::Result<String> {
    required_var("DATABASE_URL")
}

fn required_var(name: &str) -> anyhow::Result<String> {
    env::var(name).map_err(|_| anyhow::anyhow!("{name} is not set"))
}

fn secs_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_defaults_match_one_hour_ttl() {
        let config = CatalogConfig::default();
        assert_eq!(config.cache_ttl, Duration::from_secs(3600));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.url, "https://fakestoreapi.com/products");
    }

    #[test]
    fn unset_duration_variable_is_none() {
        assert_eq!(secs_var("CATALOG_FAVORITES_TEST_UNSET_VAR"), None);
    }

    #[test]
    fn missing_required_variable_is_named() {
        let err = required_var("CATALOG_FAVORITES_TEST_UNSET_VAR").unwrap_err();
        assert_eq!(err.to_string(), "CATALOG_FAVORITES_TEST_UNSET_VAR is not set");
    }
}
