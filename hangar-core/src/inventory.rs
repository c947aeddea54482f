use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ClientResult;

/// Catalog entry as seen by the order service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartsFilter {
    pub ids: Vec<String>,
}

impl PartsFilter {
    pub fn by_ids(ids: &[String]) -> Self {
        Self { ids: ids.to_vec() }
    }
}

/// Read-only, idempotent lookup against the inventory service.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    async fn list_parts(&self, filter: &PartsFilter) -> ClientResult<Vec<Part>>;
}
