use tokio::sync::oneshot;

use crate::domain::{
    Order, OrderCreate, OrderStats, OrderStatus, OversellPolicy, PaymentResult, Principal, Product,
    ProductCreate,
};
use crate::error::{OrderError, StoreError};
use crate::repository::StockAdjustment;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Raised by a client when its service task is gone.
#[derive(Debug, Clone, Copy)]
pub struct ActorGone(pub &'static str);

impl From<ActorGone> for StoreError {
    fn from(gone: ActorGone) -> Self {
        StoreError::Unavailable(gone.0.to_string())
    }
}

impl From<ActorGone> for OrderError {
    fn from(gone: ActorGone) -> Self {
        OrderError::StorageFailure(gone.0.to_string())
    }
}

/// Typed message enums for actor communication. Each variant includes parameters
/// and a oneshot channel for responses.

#[derive(Debug)]
pub enum ProductRequest {
    GetProduct {
        id: String,
        respond_to: ServiceResponse<Option<Product>, StoreError>,
    },
    CreateProduct {
        product: ProductCreate,
        respond_to: ServiceResponse<String, StoreError>,
    },
    UpdateStock {
        id: String,
        stock: u32,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    ReserveStock {
        lines: Vec<StockAdjustment>,
        policy: OversellPolicy,
        respond_to: ServiceResponse<Vec<StockAdjustment>, StoreError>,
    },
    RestoreStock {
        lines: Vec<StockAdjustment>,
        respond_to: ServiceResponse<(), StoreError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum OrderStoreRequest {
    InsertOrder {
        order: Order,
        respond_to: ServiceResponse<(), StoreError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Order>, StoreError>,
    },
    ListOrders {
        owner: Option<String>,
        respond_to: ServiceResponse<Vec<Order>, StoreError>,
    },
    ReplaceOrder {
        order: Order,
        expected_status: OrderStatus,
        respond_to: ServiceResponse<Order, StoreError>,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum OrderRequest {
    CreateOrder {
        principal: Principal,
        params: OrderCreate,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    GetOrder {
        id: String,
        principal: Principal,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    ListOrders {
        principal: Principal,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    SetStatus {
        id: String,
        status: OrderStatus,
        principal: Principal,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    MarkPaid {
        id: String,
        result: PaymentResult,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    GetStats {
        principal: Principal,
        respond_to: ServiceResponse<OrderStats, OrderError>,
    },
    Shutdown,
}
