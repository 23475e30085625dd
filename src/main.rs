use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_favorites_api::{
    catalog::{CatalogCache, CatalogClient, HttpCatalogClient},
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    routes::create_app,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,catalog_favorites_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let client: Arc<dyn CatalogClient> = Arc::new(HttpCatalogClient::new(&config.catalog)?);
    let catalog = CatalogCache::new(client, &config.catalog);
    tracing::info!(
        url = %config.catalog.url,
        ttl_secs = config.catalog.cache_ttl.as_secs(),
        "catalog cache ready"
    );

    let state = AppState {
        orm,
        catalog,
        jwt_secret: Arc::from(config.jwt_secret.as_str()),
    };
    let app = create_app(state);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!("listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
