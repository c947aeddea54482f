use async_trait::async_trait;
use hangar_shared::PaymentMethod;
use uuid::Uuid;

use crate::ClientResult;

#[async_trait]
pub trait PaymentClient: Send + Sync {
    /// Charge an order and return the provider's transaction id.
    ///
    /// Not idempotent: callers invoke this at most once per pay attempt and
    /// never retry on failure or timeout.
    async fn pay_order(
        &self,
        order_id: Uuid,
        user_id: &str,
        payment_method: PaymentMethod,
    ) -> ClientResult<String>;
}
