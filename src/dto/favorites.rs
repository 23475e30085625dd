use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::FavoriteView;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AddFavoriteRequest {
    pub product_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FavoriteList {
    #[schema(value_type = Vec<FavoriteView>)]
    pub items: Vec<FavoriteView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemovedFavorite {
    pub favorite_id: i32,
    pub product_id: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteCheck {
    pub product_id: i64,
    pub is_in_favorites: bool,
}
