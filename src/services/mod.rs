pub mod customer_service;
pub mod favorite_service;
pub mod favorite_store;
pub mod favorite_views;
pub mod product_service;
