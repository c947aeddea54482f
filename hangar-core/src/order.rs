use chrono::{DateTime, Utc};
use hangar_shared::PaymentMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Order status in the lifecycle
///
/// ```text
/// PENDING_PAYMENT ──► PAID ──► ASSEMBLED
///        │
///        └──────────► CANCELLED
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    PendingPayment,
    Paid,
    Cancelled,
    Assembled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Assembled => "ASSEMBLED",
        }
    }

    /// The only legal edges of the lifecycle.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::PendingPayment, OrderStatus::Paid)
                | (OrderStatus::PendingPayment, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Assembled)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Assembled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING_PAYMENT" => Ok(OrderStatus::PendingPayment),
            "PAID" => Ok(OrderStatus::Paid),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            "ASSEMBLED" => Ok(OrderStatus::Assembled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid state transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// A customer's purchase of spacecraft parts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub order_id: Uuid,
    pub user_id: String,
    pub part_ids: Vec<String>,
    /// Sum of part prices as observed when the order was created.
    pub total_price: f64,
    pub status: OrderStatus,
    pub transaction_id: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(user_id: String, part_ids: Vec<String>, total_price: f64) -> Self {
        let now = Utc::now();
        Self {
            order_id: Uuid::new_v4(),
            user_id,
            part_ids,
            total_price,
            status: OrderStatus::PendingPayment,
            transaction_id: None,
            payment_method: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Transition: PENDING_PAYMENT → PAID. Payment details are write-once.
    pub fn mark_paid(
        &mut self,
        transaction_id: String,
        payment_method: PaymentMethod,
    ) -> Result<(), InvalidTransition> {
        self.transition(OrderStatus::Paid)?;
        self.transaction_id = Some(transaction_id);
        self.payment_method = Some(payment_method);
        Ok(())
    }

    /// Transition: PENDING_PAYMENT → CANCELLED
    pub fn cancel(&mut self) -> Result<(), InvalidTransition> {
        self.transition(OrderStatus::Cancelled)
    }

    /// Transition: PAID → ASSEMBLED
    pub fn mark_assembled(&mut self) -> Result<(), InvalidTransition> {
        self.transition(OrderStatus::Assembled)
    }

    /// Check that `next` is reachable without mutating anything.
    pub fn ensure_can_transition(&self, next: OrderStatus) -> Result<(), InvalidTransition> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }

    fn transition(&mut self, next: OrderStatus) -> Result<(), InvalidTransition> {
        self.ensure_can_transition(next)?;
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
