//! Proxy construction parameters.

/// Inputs to [`TransferProxy::new`](crate::TransferProxy::new).
///
/// Fields are optional so a caller can pass through whatever its own
/// configuration layer resolved; the proxy rejects a config that lacks an
/// endpoint or a chunk size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Base URL of the control-plane API.
    pub endpoint: Option<String>,
    /// Size of each multipart upload part in bytes.
    pub chunk_size_bytes: Option<u64>,
    /// Execution identifier sent with every request.
    pub execution_id: Option<String>,
    /// Prefix callers use to compute default output locations. Stored only.
    pub output_prefix_override: Option<String>,
}

impl ProxyConfig {
    /// Creates a config with the two required fields set.
    pub fn new(endpoint: impl Into<String>, chunk_size_bytes: u64) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            chunk_size_bytes: Some(chunk_size_bytes),
            ..Self::default()
        }
    }

    pub fn with_execution_id(mut self, execution_id: impl Into<String>) -> Self {
        self.execution_id = Some(execution_id.into());
        self
    }

    pub fn with_output_prefix_override(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix_override = Some(prefix.into());
        self
    }
}
