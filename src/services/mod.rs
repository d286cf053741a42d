//! The service tasks. Each owns its state and serves one request at a time.

mod order_service;
mod order_store;
mod product_service;

pub use order_service::OrderService;
pub use order_store::OrderStore;
pub use product_service::ProductService;
