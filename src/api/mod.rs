//! Remote side: the transport contract and its HTTP implementation.
//!
//! Transport::call(config, op, params) -> ResultEnvelope
//!
//! One call is one request; nothing here retries. Every remote or network
//! failure comes back already classified as a `CliError`.

pub mod envelope;
pub mod http;

pub use envelope::{PageInfo, ResultEnvelope};
pub use http::HttpTransport;

use serde_json::{Map, Value};

use crate::cmd::catalog::OperationDescriptor;
use crate::config::ResolvedConfig;
use crate::error::CliError;

/// Executes a single request against the remote service.
pub trait Transport {
    fn call(
        &self,
        config: &ResolvedConfig,
        op: &OperationDescriptor,
        params: &Map<String, Value>,
    ) -> Result<ResultEnvelope, CliError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(
        &self,
        config: &ResolvedConfig,
        op: &OperationDescriptor,
        params: &Map<String, Value>,
    ) -> Result<ResultEnvelope, CliError> {
        (**self).call(config, op, params)
    }
}
