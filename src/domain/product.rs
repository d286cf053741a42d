use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog categories a product can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Electronics,
    Clothing,
    #[serde(rename = "Home & Garden")]
    HomeAndGarden,
    Sports,
    Books,
    Beauty,
    Toys,
    Automotive,
    Other,
}

/// Represents a sellable item in the catalog.
///
/// Only `stock` is ever mutated by the order workflow; everything else is
/// owned by catalog management.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: Category,
    pub image: String,
    pub is_active: bool,
}

/// Payload for registering a product with the product store.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
    pub category: Category,
    pub image: String,
}

impl ProductCreate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Decimal,
        stock: u32,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            stock,
            category,
            image: String::new(),
        }
    }
}

impl From<ProductCreate> for Product {
    fn from(params: ProductCreate) -> Self {
        Self {
            id: params.id,
            name: params.name,
            price: params.price,
            stock: params.stock,
            category: params.category,
            image: params.image,
            is_active: true,
        }
    }
}

/// What to do when a line item asks for more units than are in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OversellPolicy {
    /// Reject the whole order before touching any stock.
    #[default]
    Reject,
    /// Decrement with a floor of zero and let the order through.
    Clamp,
}

impl std::str::FromStr for OversellPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(OversellPolicy::Reject),
            "clamp" => Ok(OversellPolicy::Clamp),
            other => Err(format!("unknown oversell policy '{}'", other)),
        }
    }
}
