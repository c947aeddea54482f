use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hangar_order::OrderError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Body(rejection) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text()),
            AppError::Order(err) => match err {
                OrderError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
                OrderError::PartsNotFound { .. } => {
                    (StatusCode::BAD_REQUEST, "PARTS_NOT_FOUND", err.to_string())
                }
                OrderError::OrderNotFound(_) => {
                    (StatusCode::NOT_FOUND, "ORDER_NOT_FOUND", err.to_string())
                }
                OrderError::InvalidOrderStatus { .. } => {
                    (StatusCode::CONFLICT, "INVALID_ORDER_STATUS", err.to_string())
                }
                OrderError::PaymentFailed => (
                    StatusCode::BAD_GATEWAY,
                    "PAYMENT_FAILED",
                    "Payment failed".to_string(),
                ),
                OrderError::Internal(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal Server Error".to_string(),
                ),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "code": code,
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hangar_core::OrderStatus;
    use uuid::Uuid;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (OrderError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                OrderError::PartsNotFound { requested: 2, resolved: 1 },
                StatusCode::BAD_REQUEST,
            ),
            (OrderError::OrderNotFound(Uuid::nil()), StatusCode::NOT_FOUND),
            (
                OrderError::InvalidOrderStatus {
                    order_id: Uuid::nil(),
                    status: OrderStatus::Paid,
                },
                StatusCode::CONFLICT,
            ),
            (OrderError::PaymentFailed, StatusCode::BAD_GATEWAY),
            (OrderError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).parts().0, expected);
        }
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let (_, _, message) = AppError::from(OrderError::Internal("password=hunter2".into())).parts();
        assert_eq!(message, "Internal Server Error");
    }
}
