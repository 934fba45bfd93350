use thiserror::Error;

/// Failures reported by an [`AccountService`](super::AccountService).
///
/// Every variant is recoverable from the UI with a refresh.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("azure CLI is not installed")]
    ServiceUnavailable,
    #[error("not logged in to Azure CLI")]
    Unauthenticated,
    #[error("{0}")]
    OperationFailed(String),
}

impl AccountError {
    pub fn operation_failed(message: impl Into<String>) -> AccountError {
        return AccountError::OperationFailed(message.into());
    }
}
