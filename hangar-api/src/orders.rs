use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use hangar_core::{Order, PaymentMethod};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user_uuid: String,
    pub part_uuids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_uuid: Uuid,
    pub total_price: f64,
}

#[derive(Debug, Deserialize)]
pub struct PayOrderRequest {
    pub payment_method: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PayOrderResponse {
    pub transaction_uuid: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_uuid: Uuid,
    pub user_uuid: String,
    pub part_uuids: Vec<String>,
    pub total_price: f64,
    pub transaction_uuid: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            order_uuid: order.order_id,
            user_uuid: order.user_id,
            part_uuids: order.part_ids,
            total_price: order.total_price,
            transaction_uuid: order.transaction_id,
            payment_method: order.payment_method,
            status: order.status.as_str().to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/orders", post(create_order))
        .route("/api/v1/orders/{order_uuid}", get(get_order))
        .route("/api/v1/orders/{order_uuid}/pay", post(pay_order))
        .route("/api/v1/orders/{order_uuid}/cancel", post(cancel_order))
}

fn parse_order_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("invalid order_uuid: {}", raw)))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/orders
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let Json(req) = payload?;
    if req.user_uuid.trim().is_empty() {
        return Err(AppError::Validation("user_uuid is required".to_string()));
    }

    let order = state.orders.create_order(&req.user_uuid, req.part_uuids).await?;

    Ok(Json(CreateOrderResponse {
        order_uuid: order.order_id,
        total_price: order.total_price,
    }))
}

/// GET /api/v1/orders/{order_uuid}
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_uuid): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state.orders.get_order(parse_order_id(&order_uuid)?).await?;
    Ok(Json(order.into()))
}

/// POST /api/v1/orders/{order_uuid}/pay
pub async fn pay_order(
    State(state): State<AppState>,
    Path(order_uuid): Path<String>,
    payload: Result<Json<PayOrderRequest>, JsonRejection>,
) -> Result<Json<PayOrderResponse>, AppError> {
    let order_id = parse_order_id(&order_uuid)?;
    let Json(req) = payload?;
    let payment_method = req
        .payment_method
        .parse::<PaymentMethod>()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let transaction_uuid = state.orders.pay_order(order_id, payment_method).await?;

    Ok(Json(PayOrderResponse { transaction_uuid }))
}

/// POST /api/v1/orders/{order_uuid}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_uuid): Path<String>,
) -> Result<StatusCode, AppError> {
    state.orders.cancel_order(parse_order_id(&order_uuid)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
