use async_trait::async_trait;
use hangar_core::payment::PaymentClient;
use hangar_core::{ClientResult, PaymentMethod};
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::metadata::MetadataValue;
use tonic::transport::Channel;
use tracing::info;
use uuid::Uuid;

use super::proto::payment as pb;
use super::{lazy_channel, not_ready, status_to_client_error};

/// Metadata header carrying the order id, so the payment provider can
/// collapse duplicate charges for the same order.
pub const IDEMPOTENCY_KEY: &str = "idempotency-key";

#[derive(Clone)]
pub struct GrpcPaymentClient {
    inner: Grpc<Channel>,
}

impl GrpcPaymentClient {
    pub fn connect_lazy(url: &str, timeout: Duration) -> Result<Self, tonic::transport::Error> {
        Ok(Self {
            inner: Grpc::new(lazy_channel(url, timeout)?),
        })
    }
}

fn to_wire(method: PaymentMethod) -> pb::PaymentMethod {
    match method {
        PaymentMethod::Unknown => pb::PaymentMethod::UnknownUnspecified,
        PaymentMethod::Card => pb::PaymentMethod::Card,
        PaymentMethod::Sbp => pb::PaymentMethod::Sbp,
        PaymentMethod::CreditCard => pb::PaymentMethod::CreditCard,
        PaymentMethod::InvestorMoney => pb::PaymentMethod::InvestorMoney,
    }
}

fn pay_request(order_id: Uuid, user_id: &str, method: PaymentMethod) -> tonic::Request<pb::PayOrderRequest> {
    let mut request = tonic::Request::new(pb::PayOrderRequest {
        order_uuid: order_id.to_string(),
        user_uuid: user_id.to_string(),
        payment_method: to_wire(method) as i32,
    });

    // A hyphenated uuid is always valid ASCII metadata.
    if let Ok(value) = MetadataValue::try_from(order_id.to_string()) {
        request.metadata_mut().insert(IDEMPOTENCY_KEY, value);
    }
    request
}

#[async_trait]
impl PaymentClient for GrpcPaymentClient {
    async fn pay_order(
        &self,
        order_id: Uuid,
        user_id: &str,
        payment_method: PaymentMethod,
    ) -> ClientResult<String> {
        let mut grpc = self.inner.clone();
        grpc.ready().await.map_err(not_ready)?;

        let path = http::uri::PathAndQuery::from_static(pb::PAY_ORDER_PATH);
        let response: tonic::Response<pb::PayOrderResponse> = grpc
            .unary(pay_request(order_id, user_id, payment_method), path, ProstCodec::default())
            .await
            .map_err(status_to_client_error)?;

        let transaction_id = response.into_inner().transaction_uuid;
        info!(order_id = %order_id, transaction_id = %transaction_id, "Payment accepted");
        Ok(transaction_id)
    }
}
