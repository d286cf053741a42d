//! JSON shapes of the order API. Money leaves here rounded to cents.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::{
    LineItem, Order, OrderCreate, OrderStats, OrderStatus, PaymentMethod, PaymentResult,
    ShippingAddress,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderBody {
    #[serde(default, alias = "lineItems")]
    pub order_items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

impl From<CreateOrderBody> for OrderCreate {
    fn from(body: CreateOrderBody) -> Self {
        OrderCreate {
            items: body.order_items,
            shipping_address: body.shipping_address,
            payment_method: body.payment_method,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    pub user: String,
    pub order_items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub status: OrderStatus,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_result: Option<PaymentResult>,
    pub is_delivered: bool,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let prices = order.breakdown().rounded();
        Self {
            id: order.id.clone(),
            user: order.user_id.clone(),
            order_items: order.items.clone(),
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method,
            items_price: prices.items_price,
            tax_price: prices.tax_price,
            shipping_price: prices.shipping_price,
            total_price: prices.total_price,
            status: order.status(),
            is_paid: order.is_paid(),
            paid_at: order.paid_at(),
            payment_result: order.payment_result().cloned(),
            is_delivered: order.is_delivered(),
            delivered_at: order.delivered_at(),
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsView {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    pub total_revenue: Decimal,
}

impl From<&OrderStats> for StatsView {
    fn from(stats: &OrderStats) -> Self {
        Self {
            total_orders: stats.total_orders,
            pending_orders: stats.pending_orders,
            delivered_orders: stats.delivered_orders,
            total_revenue: stats
                .total_revenue
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        }
    }
}
