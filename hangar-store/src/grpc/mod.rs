pub mod inventory;
pub mod payment;
pub mod proto;

pub use inventory::GrpcInventoryClient;
pub use payment::GrpcPaymentClient;

use hangar_core::ClientError;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};

/// Lazily connected channel; the first RPC dials the upstream.
pub(crate) fn lazy_channel(url: &str, timeout: Duration) -> Result<Channel, tonic::transport::Error> {
    Ok(Endpoint::from_shared(url.to_string())?
        .connect_timeout(timeout)
        .timeout(timeout)
        .connect_lazy())
}

pub(crate) fn status_to_client_error(status: Status) -> ClientError {
    match status.code() {
        Code::InvalidArgument
        | Code::NotFound
        | Code::FailedPrecondition
        | Code::AlreadyExists
        | Code::PermissionDenied
        | Code::Unauthenticated
        | Code::OutOfRange => ClientError::Rejected(status.message().to_string()),
        Code::Unavailable | Code::ResourceExhausted => {
            ClientError::Unavailable(status.message().to_string())
        }
        // tonic reports its own request timeout as Cancelled
        Code::DeadlineExceeded | Code::Cancelled => ClientError::Timeout,
        code => ClientError::Transport(format!("{:?}: {}", code, status.message())),
    }
}

pub(crate) fn not_ready(e: tonic::transport::Error) -> ClientError {
    ClientError::Unavailable(format!("Service was not ready: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            status_to_client_error(Status::invalid_argument("bad card")),
            ClientError::Rejected(m) if m == "bad card"
        ));
        assert!(matches!(
            status_to_client_error(Status::unavailable("down")),
            ClientError::Unavailable(_)
        ));
        assert!(matches!(
            status_to_client_error(Status::deadline_exceeded("slow")),
            ClientError::Timeout
        ));
        assert!(matches!(
            status_to_client_error(Status::internal("boom")),
            ClientError::Transport(_)
        ));
    }
}
