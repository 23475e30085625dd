use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::catalog::CatalogCache;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub catalog: CatalogCache,
    pub jwt_secret: Arc<str>,
}
