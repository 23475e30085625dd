use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Product;

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ProductSearchQuery {
    /// Matched case-insensitively against title, description and category.
    pub q: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
