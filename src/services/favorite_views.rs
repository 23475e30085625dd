use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use crate::{
    catalog::CatalogCache,
    error::AppResult,
    models::{FavoriteView, Product},
    services::favorite_store,
};

/// Live favorites of `customer_id`, newest first, each paired with its
/// product from the catalog snapshot (`None` when the catalog lacks it).
pub async fn views_for_customer<C: ConnectionTrait>(
    db: &C,
    catalog: &CatalogCache,
    customer_id: i32,
) -> AppResult<Vec<FavoriteView>> {
    let favorites = favorite_store::list_by_customer(db, customer_id).await?;
    if favorites.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = favorites.iter().map(|f| f.product_id).collect();
    let mut products: HashMap<i64, Product> = catalog
        .filter_by_ids(&ids)
        .await
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let views = favorites
        .into_iter()
        .map(|favorite| {
            let product = products.remove(&favorite.product_id);
            FavoriteView { favorite, product }
        })
        .collect();

    Ok(views)
}
