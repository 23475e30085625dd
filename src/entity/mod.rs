pub mod customers;
pub mod favorites;

pub use customers::Entity as Customers;
pub use favorites::Entity as Favorites;
