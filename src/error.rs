use thiserror::Error;

use crate::domain::OrderStatus;

/// Failures raised by the product and order stores.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: u32,
        available: u32,
    },
    #[error("Write conflict on order {id}: expected status {expected}, found {actual}")]
    Conflict {
        id: String,
        expected: OrderStatus,
        actual: OrderStatus,
    },
    #[error("Order already exists: {0}")]
    DuplicateOrder(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the order workflow to its callers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("No order items")]
    EmptyCart,
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl OrderError {
    /// Stable name of the variant, for callers that branch on the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            OrderError::InvalidInput(_) => "InvalidInput",
            OrderError::EmptyCart => "EmptyCart",
            OrderError::InsufficientStock(_) => "InsufficientStock",
            OrderError::NotFound(_) => "NotFound",
            OrderError::Forbidden(_) => "Forbidden",
            OrderError::InvalidTransition { .. } => "InvalidTransition",
            OrderError::StorageFailure(_) => "StorageFailure",
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProductNotFound(_) | StoreError::OrderNotFound(_) => {
                OrderError::NotFound(err.to_string())
            }
            StoreError::InsufficientStock { .. } => OrderError::InsufficientStock(err.to_string()),
            StoreError::Conflict { .. }
            | StoreError::DuplicateOrder(_)
            | StoreError::Unavailable(_) => {
                OrderError::StorageFailure(err.to_string())
            }
        }
    }
}
