use async_trait::async_trait;
use hangar_core::inventory::{InventoryClient, Part, PartsFilter};
use hangar_core::ClientResult;
use std::time::Duration;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::Channel;
use tracing::debug;

use super::proto::inventory as pb;
use super::{lazy_channel, not_ready, status_to_client_error};

#[derive(Clone)]
pub struct GrpcInventoryClient {
    inner: Grpc<Channel>,
}

impl GrpcInventoryClient {
    pub fn connect_lazy(url: &str, timeout: Duration) -> Result<Self, tonic::transport::Error> {
        Ok(Self {
            inner: Grpc::new(lazy_channel(url, timeout)?),
        })
    }
}

impl From<pb::Part> for Part {
    fn from(part: pb::Part) -> Self {
        Self {
            id: part.uuid,
            name: part.name,
            price: part.price,
        }
    }
}

#[async_trait]
impl InventoryClient for GrpcInventoryClient {
    async fn list_parts(&self, filter: &PartsFilter) -> ClientResult<Vec<Part>> {
        let mut grpc = self.inner.clone();
        grpc.ready().await.map_err(not_ready)?;

        let request = tonic::Request::new(pb::ListPartsRequest {
            filter: Some(pb::PartsFilter {
                uuids: filter.ids.clone(),
            }),
        });
        let path = http::uri::PathAndQuery::from_static(pb::LIST_PARTS_PATH);

        let response: tonic::Response<pb::ListPartsResponse> = grpc
            .unary(request, path, ProstCodec::default())
            .await
            .map_err(status_to_client_error)?;

        let parts: Vec<Part> = response
            .into_inner()
            .parts
            .into_iter()
            .map(Part::from)
            .collect();

        debug!(requested = filter.ids.len(), resolved = parts.len(), "ListParts");
        Ok(parts)
    }
}
