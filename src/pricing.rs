//! Order pricing: subtotal, tax, shipping and total for a list of line items.
//!
//! Amounts are kept at full decimal precision. Rounding to cents happens only
//! when a breakdown is presented, via [`PriceBreakdown::rounded`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::LineItem;
use crate::error::OrderError;

/// 10% sales tax on the items subtotal.
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);
/// Subtotals strictly above this ship for free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

impl PriceBreakdown {
    /// Cent-rounded copy for display.
    pub fn rounded(&self) -> Self {
        let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            items_price: round(self.items_price),
            tax_price: round(self.tax_price),
            shipping_price: round(self.shipping_price),
            total_price: round(self.total_price),
        }
    }
}

pub fn shipping_for(items_price: Decimal) -> Decimal {
    if items_price > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Prices a cart.
///
/// # Errors
/// `InvalidInput` for an empty list, a zero quantity, a negative unit price,
/// or a subtotal too large to represent.
pub fn calculate(items: &[LineItem]) -> Result<PriceBreakdown, OrderError> {
    if items.is_empty() {
        return Err(OrderError::InvalidInput("no line items to price".to_string()));
    }

    let mut items_price = Decimal::ZERO;
    for item in items {
        if item.quantity == 0 {
            return Err(OrderError::InvalidInput(format!(
                "quantity for product {} must be at least 1",
                item.product_id
            )));
        }
        if item.unit_price < Decimal::ZERO {
            return Err(OrderError::InvalidInput(format!(
                "price for product {} cannot be negative",
                item.product_id
            )));
        }
        items_price = item
            .unit_price
            .checked_mul(Decimal::from(item.quantity))
            .and_then(|line_total| items_price.checked_add(line_total))
            .ok_or_else(|| OrderError::InvalidInput("order amount out of range".to_string()))?;
    }

    let tax_price = items_price * TAX_RATE;
    let shipping_price = shipping_for(items_price);

    Ok(PriceBreakdown {
        items_price,
        tax_price,
        shipping_price,
        total_price: items_price + tax_price + shipping_price,
    })
}
