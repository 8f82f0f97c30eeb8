use serde::{Deserialize, Serialize};

use crate::store::BackendKind;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
    pub durable_store: bool,
    pub backend: BackendKind,
}

#[derive(Debug, Deserialize)]
pub struct SetCountRequest {
    pub count: u64,
}
