use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{Order, OrderCreate, OrderStats, OrderStatus, PaymentResult, Principal};
use crate::error::OrderError;
use crate::messages::OrderRequest;

/// Client for the order lifecycle service. This is what the HTTP layer holds.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(OrderClient => fn create_order(principal: Principal, params: OrderCreate) -> Order as OrderRequest::CreateOrder, Error = OrderError);
client_method!(OrderClient => fn get_order(id: String, principal: Principal) -> Order as OrderRequest::GetOrder, Error = OrderError);
client_method!(OrderClient => fn list_orders(principal: Principal) -> Vec<Order> as OrderRequest::ListOrders, Error = OrderError);
client_method!(OrderClient => fn set_status(id: String, status: OrderStatus, principal: Principal) -> Order as OrderRequest::SetStatus, Error = OrderError);
client_method!(OrderClient => fn mark_paid(id: String, result: PaymentResult) -> Order as OrderRequest::MarkPaid, Error = OrderError);
client_method!(OrderClient => fn get_stats(principal: Principal) -> OrderStats as OrderRequest::GetStats, Error = OrderError);
