//! # Mock Framework
//!
//! Utilities for testing the order service without its stores.
//!
//! [`create_mock_product_client`] and [`create_mock_order_store_client`] hand
//! back a real client wired to a receiver the test controls. Helpers such as
//! [`expect_reserve`] pull the next request off that receiver so the test can
//! assert on it and answer it, success or failure.
//!
//! [`FaultyProducts`] and [`FaultyOrders`] wrap live store clients and fail a
//! chosen operation on demand, for exercising the compensation paths.
//! [`GatedOrders`] holds lookups at a barrier so concurrent writers are
//! guaranteed to read the same state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Barrier};

use crate::clients::{OrderStoreClient, ProductClient};
use crate::domain::{Order, OrderStatus, OversellPolicy};
use crate::error::StoreError;
use crate::messages::{OrderStoreRequest, ProductRequest, ServiceResponse};
use crate::repository::{OrderRepository, ProductRepository, StockAdjustment};

pub fn create_mock_product_client(buffer_size: usize) -> (ProductClient, mpsc::Receiver<ProductRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ProductClient::new(sender), receiver)
}

pub fn create_mock_order_store_client(buffer_size: usize) -> (OrderStoreClient, mpsc::Receiver<OrderStoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (OrderStoreClient::new(sender), receiver)
}

/// Next message must be a stock reservation.
pub async fn expect_reserve(
    receiver: &mut mpsc::Receiver<ProductRequest>,
) -> Option<(Vec<StockAdjustment>, OversellPolicy, ServiceResponse<Vec<StockAdjustment>, StoreError>)> {
    match receiver.recv().await {
        Some(ProductRequest::ReserveStock {
            lines,
            policy,
            respond_to,
        }) => Some((lines, policy, respond_to)),
        _ => None,
    }
}

/// Next message must be a stock restore.
pub async fn expect_restore(
    receiver: &mut mpsc::Receiver<ProductRequest>,
) -> Option<(Vec<StockAdjustment>, ServiceResponse<(), StoreError>)> {
    match receiver.recv().await {
        Some(ProductRequest::RestoreStock { lines, respond_to }) => Some((lines, respond_to)),
        _ => None,
    }
}

/// Next message must be an order insert.
pub async fn expect_insert(
    receiver: &mut mpsc::Receiver<OrderStoreRequest>,
) -> Option<(Order, ServiceResponse<(), StoreError>)> {
    match receiver.recv().await {
        Some(OrderStoreRequest::InsertOrder { order, respond_to }) => Some((order, respond_to)),
        _ => None,
    }
}

/// Product store that can be told to refuse restores.
pub struct FaultyProducts {
    inner: ProductClient,
    fail_restores: AtomicBool,
}

impl FaultyProducts {
    pub fn new(inner: ProductClient) -> Self {
        Self {
            inner,
            fail_restores: AtomicBool::new(false),
        }
    }

    pub fn fail_restores(&self, fail: bool) {
        self.fail_restores.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductRepository for FaultyProducts {
    async fn reserve(
        &self,
        lines: Vec<StockAdjustment>,
        policy: OversellPolicy,
    ) -> Result<Vec<StockAdjustment>, StoreError> {
        self.inner.reserve(lines, policy).await
    }

    async fn restore(&self, lines: Vec<StockAdjustment>) -> Result<(), StoreError> {
        if self.fail_restores.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected restore failure".to_string()));
        }
        self.inner.restore(lines).await
    }
}

/// Order store that can be told to refuse inserts, or to refuse replaces
/// once a number of them have gone through.
pub struct FaultyOrders {
    inner: OrderStoreClient,
    fail_inserts: AtomicBool,
    replaces_left: AtomicUsize,
}

impl FaultyOrders {
    pub fn new(inner: OrderStoreClient) -> Self {
        Self {
            inner,
            fail_inserts: AtomicBool::new(false),
            replaces_left: AtomicUsize::new(usize::MAX),
        }
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Let `count` more replaces through, then fail the rest.
    pub fn allow_replaces(&self, count: usize) {
        self.replaces_left.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl OrderRepository for FaultyOrders {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected insert failure".to_string()));
        }
        self.inner.insert(order).await
    }

    async fn find(&self, id: String) -> Result<Option<Order>, StoreError> {
        self.inner.find(id).await
    }

    async fn list(&self, owner: Option<String>) -> Result<Vec<Order>, StoreError> {
        self.inner.list(owner).await
    }

    async fn replace(&self, order: Order, expected_status: OrderStatus) -> Result<Order, StoreError> {
        let allowed = self
            .replaces_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if !allowed {
            return Err(StoreError::Unavailable("injected replace failure".to_string()));
        }
        self.inner.replace(order, expected_status).await
    }
}

/// Order store whose `find` waits until every party sharing the barrier has
/// read. Writes pass straight through.
pub struct GatedOrders {
    inner: OrderStoreClient,
    gate: Arc<Barrier>,
}

impl GatedOrders {
    pub fn new(inner: OrderStoreClient, gate: Arc<Barrier>) -> Self {
        Self { inner, gate }
    }
}

#[async_trait]
impl OrderRepository for GatedOrders {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        self.inner.insert(order).await
    }

    async fn find(&self, id: String) -> Result<Option<Order>, StoreError> {
        let found = self.inner.find(id).await;
        self.gate.wait().await;
        found
    }

    async fn list(&self, owner: Option<String>) -> Result<Vec<Order>, StoreError> {
        self.inner.list(owner).await
    }

    async fn replace(&self, order: Order, expected_status: OrderStatus) -> Result<Order, StoreError> {
        self.inner.replace(order, expected_status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_product_client(10);

        let reserve_task = tokio::spawn(async move {
            client
                .reserve_stock(vec![StockAdjustment::new("p1", 2)], OversellPolicy::Reject)
                .await
        });

        let (lines, policy, responder) = expect_reserve(&mut receiver).await.expect("Expected ReserveStock request");
        assert_eq!(lines, vec![StockAdjustment::new("p1", 2)]);
        assert_eq!(policy, OversellPolicy::Reject);
        responder.send(Ok(lines)).unwrap();

        let result = reserve_task.await.unwrap();
        assert_eq!(result, Ok(vec![StockAdjustment::new("p1", 2)]));
    }

    #[tokio::test]
    async fn test_dropped_responder_surfaces_as_unavailable() {
        let (client, mut receiver) = create_mock_order_store_client(10);

        let list_task = tokio::spawn(async move { client.list_orders(None).await });
        drop(receiver.recv().await);

        let result = list_task.await.unwrap();
        assert_eq!(result, Err(StoreError::Unavailable("Actor dropped".to_string())));
    }
}
