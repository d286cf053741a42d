use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{Order, OrderStatus};
use crate::error::StoreError;
use crate::messages::OrderStoreRequest;
use crate::repository::OrderRepository;

/// Client for the order document store.
#[derive(Clone)]
pub struct OrderStoreClient {
    sender: mpsc::Sender<OrderStoreRequest>,
}

impl OrderStoreClient {
    pub fn new(sender: mpsc::Sender<OrderStoreRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderStoreRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(OrderStoreClient => fn insert_order(order: Order) -> () as OrderStoreRequest::InsertOrder, Error = StoreError);
client_method!(OrderStoreClient => fn get_order(id: String) -> Option<Order> as OrderStoreRequest::GetOrder, Error = StoreError);
client_method!(OrderStoreClient => fn list_orders(owner: Option<String>) -> Vec<Order> as OrderStoreRequest::ListOrders, Error = StoreError);
client_method!(OrderStoreClient => fn replace_order(order: Order, expected_status: OrderStatus) -> Order as OrderStoreRequest::ReplaceOrder, Error = StoreError);

#[async_trait]
impl OrderRepository for OrderStoreClient {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        self.insert_order(order).await
    }

    async fn find(&self, id: String) -> Result<Option<Order>, StoreError> {
        self.get_order(id).await
    }

    async fn list(&self, owner: Option<String>) -> Result<Vec<Order>, StoreError> {
        self.list_orders(owner).await
    }

    async fn replace(&self, order: Order, expected_status: OrderStatus) -> Result<Order, StoreError> {
        self.replace_order(order, expected_status).await
    }
}
