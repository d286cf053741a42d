//! REST surface over the order service.
//!
//! ## Routes
//!
//! - `POST /orders`: place an order for the calling user.
//! - `GET /orders`: own orders, or every order for an admin.
//! - `GET /orders/:id`: one order, owner or admin only.
//! - `PUT /orders/:id/status`: admin status change.
//! - `PUT /orders/:id/pay`: record a payment result.
//! - `GET /orders/admin/stats`: admin dashboard numbers.
//! - `GET /health`: liveness.
//!
//! Authentication happens upstream; the caller arrives as `x-user-id` and
//! `x-user-role` headers.

mod dto;
mod error;

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::json;
use tracing::{info, instrument};

use crate::clients::OrderClient;
use crate::domain::PaymentResult;

pub use dto::{CreateOrderBody, OrderView, StatsView, StatusBody};
pub use error::{principal_from_headers, ApiError, USER_ID_HEADER, USER_ROLE_HEADER};

/// Build the order API router on top of a running order service.
pub fn router(orders: OrderClient) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/orders", get(list_orders_handler).post(create_order_handler))
        .route("/orders/admin/stats", get(stats_handler))
        .route("/orders/:id", get(get_order_handler))
        .route("/orders/:id/status", put(set_status_handler))
        .route("/orders/:id/pay", put(pay_handler))
        .with_state(orders)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(orders: OrderClient, listener: tokio::net::TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP server listening");
    }
    axum::serve(listener, router(orders))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

#[instrument(skip_all)]
async fn create_order_handler(
    State(orders): State<OrderClient>,
    headers: HeaderMap,
    body: Result<Json<CreateOrderBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = principal_from_headers(&headers)?;
    let Json(body) = body?;
    let order = orders.create_order(principal, body.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "order": OrderView::from(&order) })),
    ))
}

#[instrument(skip_all)]
async fn list_orders_handler(
    State(orders): State<OrderClient>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let principal = principal_from_headers(&headers)?;
    let listed = orders.list_orders(principal).await?;
    let views: Vec<OrderView> = listed.iter().map(OrderView::from).collect();
    Ok(Json(json!({ "success": true, "count": views.len(), "orders": views })))
}

#[instrument(skip_all, fields(order_id = %id))]
async fn get_order_handler(
    State(orders): State<OrderClient>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let principal = principal_from_headers(&headers)?;
    let order = orders.get_order(id, principal).await?;
    Ok(Json(json!({ "success": true, "order": OrderView::from(&order) })))
}

#[instrument(skip_all, fields(order_id = %id))]
async fn set_status_handler(
    State(orders): State<OrderClient>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<StatusBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let principal = principal_from_headers(&headers)?;
    let Json(body) = body?;
    let order = orders.set_status(id, body.status, principal).await?;
    Ok(Json(json!({ "success": true, "order": OrderView::from(&order) })))
}

#[instrument(skip_all, fields(order_id = %id))]
async fn pay_handler(
    State(orders): State<OrderClient>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<PaymentResult>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // Any authenticated caller may record a payment.
    principal_from_headers(&headers)?;
    let Json(body) = body?;
    let order = orders.mark_paid(id, body).await?;
    Ok(Json(json!({ "success": true, "order": OrderView::from(&order) })))
}

#[instrument(skip_all)]
async fn stats_handler(
    State(orders): State<OrderClient>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let principal = principal_from_headers(&headers)?;
    let stats = orders.get_stats(principal).await?;
    Ok(Json(json!({ "success": true, "stats": StatsView::from(&stats) })))
}
