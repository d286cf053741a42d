//! Storage seams for the order workflow.
//!
//! The lifecycle manager only ever talks to these traits. The actor clients
//! implement them for the in-memory stores; tests swap in fakes.

use async_trait::async_trait;

use crate::domain::{LineItem, Order, OrderStatus, OversellPolicy};
use crate::error::StoreError;

/// A stock movement for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockAdjustment {
    pub product_id: String,
    pub quantity: u32,
}

impl StockAdjustment {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }

    /// One adjustment per distinct product, in first-seen order.
    pub fn from_items(items: &[LineItem]) -> Vec<Self> {
        let mut lines: Vec<StockAdjustment> = Vec::with_capacity(items.len());
        for item in items {
            match lines.iter_mut().find(|line| line.product_id == item.product_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => lines.push(StockAdjustment::new(item.product_id.clone(), item.quantity)),
            }
        }
        lines
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Decrements stock for every line as one unit: either all lines are
    /// applied or none are. Returns the amounts actually taken, which differ
    /// from the request only under [`OversellPolicy::Clamp`].
    async fn reserve(
        &self,
        lines: Vec<StockAdjustment>,
        policy: OversellPolicy,
    ) -> Result<Vec<StockAdjustment>, StoreError>;

    /// Adds the quantities back with no upper bound. Products that no longer
    /// exist are skipped.
    async fn restore(&self, lines: Vec<StockAdjustment>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    async fn find(&self, id: String) -> Result<Option<Order>, StoreError>;

    /// Newest first. `owner` narrows the result to one user's orders.
    async fn list(&self, owner: Option<String>) -> Result<Vec<Order>, StoreError>;

    /// Overwrites a stored order only if its status still equals `expected_status`.
    async fn replace(&self, order: Order, expected_status: OrderStatus) -> Result<Order, StoreError>;
}
