pub mod customers;
pub mod favorites;
pub mod products;
