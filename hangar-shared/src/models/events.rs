use uuid::Uuid;

use super::payment::PaymentMethod;

/// Emitted once an order's PAID transition has been persisted.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct OrderPaidEvent {
    pub event_id: Uuid,
    pub order_id: Uuid,
    pub user_id: String,
    pub payment_method: PaymentMethod,
    pub transaction_id: String,
}

impl OrderPaidEvent {
    pub fn new(
        order_id: Uuid,
        user_id: String,
        payment_method: PaymentMethod,
        transaction_id: String,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            order_id,
            user_id,
            payment_method,
            transaction_id,
        }
    }
}

/// Published by the assembly service when a ship build for an order finishes.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct OrderAssembledEvent {
    pub event_id: Uuid,
    pub order_id: Uuid,
    pub user_id: String,
    pub build_time_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembled_event_wire_format() {
        let payload = r#"{
            "event_id": "6f1c1d2e-0000-4000-8000-000000000001",
            "order_id": "6f1c1d2e-0000-4000-8000-000000000002",
            "user_id": "user-1",
            "build_time_seconds": 42
        }"#;

        let event: OrderAssembledEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.user_id, "user-1");
        assert_eq!(event.build_time_seconds, 42);
    }

    #[test]
    fn test_paid_event_uses_screaming_payment_method() {
        let event = OrderPaidEvent::new(
            Uuid::new_v4(),
            "user-1".to_string(),
            PaymentMethod::CreditCard,
            "txn-1".to_string(),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["payment_method"], "CREDIT_CARD");
        assert_eq!(json["transaction_id"], "txn-1");
    }
}
