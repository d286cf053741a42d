use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::clients::OrderClient;
use crate::domain::{
    Order, OrderCreate, OrderStats, OrderStatus, OversellPolicy, PaymentResult, Principal,
};
use crate::error::OrderError;
use crate::messages::OrderRequest;
use crate::pricing;
use crate::repository::{OrderRepository, ProductRepository, StockAdjustment};

/// Root service for the order lifecycle.
///
/// Holds no order data itself: it prices carts, then coordinates the product
/// and order repositories, compensating when the second step of a two-step
/// write fails.
///
/// `unrestored` tracks cancelled orders whose stock never made it back to the
/// product store. Cancelling such an order again retries the restore.
pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    oversell_policy: OversellPolicy,
    unrestored: HashMap<String, Vec<StockAdjustment>>,
}

fn require_admin(principal: &Principal, action: &str) -> Result<(), OrderError> {
    if principal.is_admin {
        Ok(())
    } else {
        warn!(user_id = %principal.user_id, action, "Admin capability required");
        Err(OrderError::Forbidden(format!("admin access required to {}", action)))
    }
}

impl OrderService {
    pub fn new(
        buffer_size: usize,
        products: Arc<dyn ProductRepository>,
        orders: Arc<dyn OrderRepository>,
        oversell_policy: OversellPolicy,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            products,
            orders,
            oversell_policy,
            unrestored: HashMap::new(),
        };
        let client = OrderClient::new(sender);
        (service, client)
    }

    #[instrument(name = "order_service", skip(self), fields(oversell_policy = ?self.oversell_policy))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::CreateOrder {
                    principal,
                    params,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_create_order(principal, params).await);
                }
                OrderRequest::GetOrder {
                    id,
                    principal,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_get_order(id, principal).await);
                }
                OrderRequest::ListOrders {
                    principal,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_list_orders(principal).await);
                }
                OrderRequest::SetStatus {
                    id,
                    status,
                    principal,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_set_status(id, status, principal).await);
                }
                OrderRequest::MarkPaid {
                    id,
                    result,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_mark_paid(id, result).await);
                }
                OrderRequest::GetStats {
                    principal,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_get_stats(principal).await);
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
            }
        }

        info!("OrderService stopped");
    }

    async fn load(&self, id: &str) -> Result<Order, OrderError> {
        match self.orders.find(id.to_string()).await? {
            Some(order) => Ok(order),
            None => {
                debug!(order_id = %id, "Order not found");
                Err(OrderError::NotFound(format!("Order not found: {}", id)))
            }
        }
    }

    /// **Orchestration**: price, reserve stock for every line in one step,
    /// then persist. A failed insert hands the reserved units back.
    #[instrument(
        fields(user_id = %principal.user_id, line_count = params.items.len()),
        skip(self, principal, params)
    )]
    async fn handle_create_order(&self, principal: Principal, params: OrderCreate) -> Result<Order, OrderError> {
        info!("Processing create_order request");

        if params.items.is_empty() {
            warn!("Rejected order with no items");
            return Err(OrderError::EmptyCart);
        }
        let breakdown = pricing::calculate(&params.items)?;
        let lines = StockAdjustment::from_items(&params.items);

        let reserved = self
            .products
            .reserve(lines, self.oversell_policy)
            .await
            .map_err(|e| {
                error!(error = %e, "Stock reservation failed");
                OrderError::from(e)
            })?;
        debug!("Stock reserved");

        let order = Order::new(
            Uuid::new_v4().to_string(),
            principal.user_id,
            params,
            breakdown,
            Utc::now(),
        );

        if let Err(e) = self.orders.insert(order.clone()).await {
            error!(error = %e, "Order insert failed, releasing reserved stock");
            if let Err(undo) = self.products.restore(reserved).await {
                error!(error = %undo, "Could not release reserved stock");
            }
            return Err(OrderError::StorageFailure(e.to_string()));
        }

        info!(order_id = %order.id, total = %order.breakdown().total_price, "Order created successfully");
        Ok(order)
    }

    #[instrument(fields(order_id = %id, user_id = %principal.user_id), skip(self, principal))]
    async fn handle_get_order(&self, id: String, principal: Principal) -> Result<Order, OrderError> {
        debug!("Processing get_order request");

        let order = self.load(&id).await?;
        if !principal.can_view(&order) {
            warn!("Order belongs to another user");
            return Err(OrderError::Forbidden("Not authorized to view this order".to_string()));
        }
        Ok(order)
    }

    #[instrument(fields(user_id = %principal.user_id, is_admin = principal.is_admin), skip(self, principal))]
    async fn handle_list_orders(&self, principal: Principal) -> Result<Vec<Order>, OrderError> {
        debug!("Processing list_orders request");

        let owner = if principal.is_admin { None } else { Some(principal.user_id) };
        let orders = self.orders.list(owner).await?;
        info!(order_count = orders.len(), "Listed orders");
        Ok(orders)
    }

    /// Admin status change. Requesting the current status is a no-op, which
    /// keeps retries (and repeated cancellations) from restoring stock twice.
    #[instrument(fields(order_id = %id, next = %status), skip(self, status, principal))]
    async fn handle_set_status(
        &mut self,
        id: String,
        status: OrderStatus,
        principal: Principal,
    ) -> Result<Order, OrderError> {
        info!("Processing set_status request");

        require_admin(&principal, "update order status")?;
        let mut order = self.load(&id).await?;
        let current = order.status();

        if current == status {
            info!("Order already in requested status");
            if status == OrderStatus::Cancelled {
                self.retry_unrestored(&order.id).await?;
            }
            return Ok(order);
        }
        if !current.can_transition_to(status) {
            warn!(current = %current, "Transition not allowed");
            return Err(OrderError::InvalidTransition {
                from: current,
                to: status,
            });
        }

        order.apply_status(status, Utc::now());
        let updated = self.orders.replace(order, current).await?;

        if status == OrderStatus::Cancelled {
            let lines = StockAdjustment::from_items(&updated.items);
            if let Err(e) = self.products.restore(lines.clone()).await {
                error!(error = %e, "Stock restore failed, reverting cancellation");
                let mut reverted = updated;
                reverted.apply_status(current, Utc::now());
                if let Err(undo) = self.orders.replace(reverted, OrderStatus::Cancelled).await {
                    error!(
                        error = %undo,
                        order_id = %id,
                        lines = ?lines,
                        "Could not revert cancellation, stock left unrestored"
                    );
                    self.unrestored.insert(id, lines);
                }
                return Err(OrderError::StorageFailure(e.to_string()));
            }
            info!("Stock restored for cancelled order");
        }

        info!(status = %updated.status(), "Order status updated");
        Ok(updated)
    }

    /// Finishes a restore left behind by a cancellation that could be neither
    /// completed nor reverted.
    async fn retry_unrestored(&mut self, id: &str) -> Result<(), OrderError> {
        let Some(lines) = self.unrestored.remove(id) else {
            return Ok(());
        };

        if let Err(e) = self.products.restore(lines.clone()).await {
            error!(error = %e, lines = ?lines, "Pending stock restore failed again");
            self.unrestored.insert(id.to_string(), lines);
            return Err(OrderError::StorageFailure(e.to_string()));
        }

        info!("Pending stock restore completed");
        Ok(())
    }

    #[instrument(fields(order_id = %id, payment_id = %result.id), skip(self, result))]
    async fn handle_mark_paid(&self, id: String, result: PaymentResult) -> Result<Order, OrderError> {
        info!("Processing mark_paid request");

        let mut order = self.load(&id).await?;
        if order.is_paid() && order.payment_result() == Some(&result) {
            info!("Payment already recorded");
            return Ok(order);
        }

        let status = order.status();
        order.mark_paid(result, Utc::now());
        let updated = self.orders.replace(order, status).await?;

        info!("Order marked as paid");
        Ok(updated)
    }

    #[instrument(fields(user_id = %principal.user_id), skip(self, principal))]
    async fn handle_get_stats(&self, principal: Principal) -> Result<OrderStats, OrderError> {
        debug!("Processing get_stats request");

        require_admin(&principal, "view order statistics")?;
        let orders = self.orders.list(None).await?;
        let stats = OrderStats::from_orders(&orders);

        info!(
            total_orders = stats.total_orders,
            total_revenue = %stats.total_revenue,
            "Computed order statistics"
        );
        Ok(stats)
    }
}
