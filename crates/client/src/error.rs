use autosheet_engine::StoreError;

use crate::client::ClientError;

/// Failure of a flow: the store rejected a mutation, the service call
/// failed, or the caller passed something unusable.
#[derive(Debug)]
pub enum FlowError {
    Store(StoreError),
    Gateway(ClientError),
    InvalidInput(String),
}

impl std::fmt::Display for FlowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlowError::Store(e) => write!(f, "{}", e),
            FlowError::Gateway(e) => write!(f, "{}", e),
            FlowError::InvalidInput(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FlowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FlowError::Store(e) => Some(e),
            FlowError::Gateway(e) => Some(e),
            FlowError::InvalidInput(_) => None,
        }
    }
}

impl From<StoreError> for FlowError {
    fn from(e: StoreError) -> Self {
        FlowError::Store(e)
    }
}

impl From<ClientError> for FlowError {
    fn from(e: ClientError) -> Self {
        FlowError::Gateway(e)
    }
}

/// A batch that stopped at its first failure.
///
/// Rows before the failing one were already written to the store and stay
/// written; `applied` says how many.
#[derive(Debug)]
pub struct BatchError {
    /// Rows fully applied before the failure.
    pub applied: usize,
    /// Rows in the batch.
    pub total: usize,
    pub error: FlowError,
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} of {} rows applied)", self.error, self.applied, self.total)
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
