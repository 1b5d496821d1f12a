mod client;
mod types;

pub use client::{ParseApiClient, ParseBackend};
pub use types::{OperationId, ParseResponse, ParsedField};
