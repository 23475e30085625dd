use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Customer, FavoriteView};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub favorites: Vec<FavoriteView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub favorites_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerList {
    #[schema(value_type = Vec<CustomerSummary>)]
    pub items: Vec<CustomerSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedCustomer {
    pub customer_id: i32,
    pub customer_name: String,
    /// Live favorites the customer had when the deletion committed.
    pub removed_favorites: u64,
}
