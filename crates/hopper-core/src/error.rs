use thiserror::Error;

#[derive(Debug, Error)]
pub enum HopperError {
    /// A storage backend rejected or failed an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// The manager's worker loop is gone (shut down or crashed).
    #[error("queue manager is closed")]
    ManagerClosed,

    /// A response referenced a request nobody is waiting for.
    #[error("no pending input request with id={0}")]
    UnknownRequest(String),

    /// Unexpected processor failure (not a business error).
    #[error("processor fault: {0}")]
    ProcessorFault(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl HopperError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    pub fn fault(message: impl Into<String>) -> Self {
        Self::ProcessorFault(message.into())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for HopperError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::ManagerClosed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for HopperError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ManagerClosed
    }
}
