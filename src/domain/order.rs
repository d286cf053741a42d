use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::PriceBreakdown;

/// Fulfillment status of an order.
///
/// `Pending -> Processing -> Shipped -> Delivered`, with any non-terminal
/// status able to move to `Cancelled`. Forward moves may skip steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether `self -> next` is a real move in the transition table.
    /// Staying in the same status is not a transition; callers treat it as a no-op.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        if self.is_terminal() || self == next {
            return false;
        }
        next == OrderStatus::Cancelled || next.rank() > self.rank()
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "PayPal")]
    PayPal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// Snapshot of a product taken when the order is placed.
///
/// Later catalog edits never reach back into existing orders. Name, image
/// and unit price are stored as the cart submitted them; the product store
/// is consulted for stock only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "product")]
    pub product_id: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            image: String::new(),
            unit_price,
            quantity,
        }
    }
}

/// Payment gateway callback data, stored as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub email_address: String,
}

/// Payload for placing a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: Option<PaymentMethod>,
}

/// A single checkout transaction.
///
/// The price breakdown is fixed at construction. Only status, payment and
/// delivery fields change afterwards, and only through the methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<LineItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    breakdown: PriceBreakdown,
    status: OrderStatus,
    is_paid: bool,
    paid_at: Option<DateTime<Utc>>,
    payment_result: Option<PaymentResult>,
    is_delivered: bool,
    delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn new(
        id: impl Into<String>,
        user_id: impl Into<String>,
        params: OrderCreate,
        breakdown: PriceBreakdown,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            items: params.items,
            shipping_address: params.shipping_address,
            payment_method: params.payment_method.unwrap_or_default(),
            created_at,
            breakdown,
            status: OrderStatus::Pending,
            is_paid: false,
            paid_at: None,
            payment_result: None,
            is_delivered: false,
            delivered_at: None,
        }
    }

    pub fn breakdown(&self) -> &PriceBreakdown {
        &self.breakdown
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.is_paid
    }

    pub fn paid_at(&self) -> Option<DateTime<Utc>> {
        self.paid_at
    }

    pub fn payment_result(&self) -> Option<&PaymentResult> {
        self.payment_result.as_ref()
    }

    pub fn is_delivered(&self) -> bool {
        self.is_delivered
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    /// Moves the order to `next`. The caller validates the move first.
    pub fn apply_status(&mut self, next: OrderStatus, now: DateTime<Utc>) {
        self.status = next;
        if next == OrderStatus::Delivered {
            self.is_delivered = true;
            self.delivered_at = Some(now);
        }
    }

    pub fn mark_paid(&mut self, result: PaymentResult, now: DateTime<Utc>) {
        self.is_paid = true;
        self.paid_at = Some(now);
        self.payment_result = Some(result);
    }
}

/// Aggregate figures for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderStats {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    pub total_revenue: Decimal,
}

impl OrderStats {
    /// Revenue counts paid orders only, whatever their status.
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(OrderStats::default(), |mut stats, order| {
            stats.total_orders += 1;
            match order.status() {
                OrderStatus::Pending => stats.pending_orders += 1,
                OrderStatus::Delivered => stats.delivered_orders += 1,
                _ => {}
            }
            if order.is_paid() {
                stats.total_revenue += order.breakdown().total_price;
            }
            stats
        })
    }
}
