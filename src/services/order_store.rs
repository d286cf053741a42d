use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::OrderStoreClient;
use crate::domain::{Order, OrderStatus};
use crate::error::StoreError;
use crate::messages::{OrderStoreRequest, ServiceResponse};

struct StoredOrder {
    seq: u64,
    order: Order,
}

/// In-memory order documents.
///
/// Orders are never removed. Writes after creation go through a conditional
/// replace keyed on the status the writer last saw.
pub struct OrderStore {
    receiver: mpsc::Receiver<OrderStoreRequest>,
    orders: HashMap<String, StoredOrder>,
    next_seq: u64,
}

impl OrderStore {
    pub fn new(buffer_size: usize) -> (Self, OrderStoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            orders: HashMap::new(),
            next_seq: 1,
        };
        let client = OrderStoreClient::new(sender);
        (store, client)
    }

    #[instrument(name = "order_store", skip(self))]
    pub async fn run(mut self) {
        info!("OrderStore starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderStoreRequest::InsertOrder { order, respond_to } => {
                    self.handle_insert_order(order, respond_to);
                }
                OrderStoreRequest::GetOrder { id, respond_to } => {
                    self.handle_get_order(id, respond_to);
                }
                OrderStoreRequest::ListOrders { owner, respond_to } => {
                    self.handle_list_orders(owner, respond_to);
                }
                OrderStoreRequest::ReplaceOrder {
                    order,
                    expected_status,
                    respond_to,
                } => {
                    self.handle_replace_order(order, expected_status, respond_to);
                }
                OrderStoreRequest::Shutdown => {
                    info!("OrderStore shutting down");
                    break;
                }
            }
        }

        info!("OrderStore stopped");
    }

    #[instrument(fields(order_id = %order.id, user_id = %order.user_id), skip(self, order, respond_to))]
    fn handle_insert_order(&mut self, order: Order, respond_to: ServiceResponse<(), StoreError>) {
        debug!("Processing insert_order request");

        let result = if self.orders.contains_key(&order.id) {
            error!("Order id already taken");
            Err(StoreError::DuplicateOrder(order.id))
        } else {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.orders.insert(order.id.clone(), StoredOrder { seq, order });
            info!("Order stored");
            Ok(())
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(order_id = %id), skip(self, respond_to))]
    fn handle_get_order(&self, id: String, respond_to: ServiceResponse<Option<Order>, StoreError>) {
        debug!("Processing get_order request");

        let order = self.orders.get(&id).map(|stored| stored.order.clone());
        if order.is_none() {
            debug!("Order not found");
        }

        let _ = respond_to.send(Ok(order));
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_orders(&self, owner: Option<String>, respond_to: ServiceResponse<Vec<Order>, StoreError>) {
        debug!("Processing list_orders request");

        let mut matching: Vec<&StoredOrder> = self
            .orders
            .values()
            .filter(|stored| owner.as_ref().map_or(true, |owner| &stored.order.user_id == owner))
            .collect();
        matching.sort_by(|a, b| b.seq.cmp(&a.seq));

        let orders: Vec<Order> = matching.into_iter().map(|stored| stored.order.clone()).collect();
        info!(order_count = orders.len(), "Listed orders");

        let _ = respond_to.send(Ok(orders));
    }

    #[instrument(
        fields(order_id = %order.id, expected = %expected_status, next = %order.status()),
        skip(self, order, expected_status, respond_to)
    )]
    fn handle_replace_order(
        &mut self,
        order: Order,
        expected_status: OrderStatus,
        respond_to: ServiceResponse<Order, StoreError>,
    ) {
        debug!("Processing replace_order request");

        let result = match self.orders.get_mut(&order.id) {
            None => {
                error!("Order not found for replace");
                Err(StoreError::OrderNotFound(order.id))
            }
            Some(stored) if stored.order.status() != expected_status => {
                error!(actual = %stored.order.status(), "Stale write rejected");
                Err(StoreError::Conflict {
                    id: order.id,
                    expected: expected_status,
                    actual: stored.order.status(),
                })
            }
            Some(stored) => {
                stored.order = order;
                info!("Order replaced");
                Ok(stored.order.clone())
            }
        };

        let _ = respond_to.send(result);
    }
}
