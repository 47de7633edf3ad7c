use thiserror::Error;

/// Failure signalled by a State Channel listener.
///
/// Never propagated to the writer; it is turned into a diagnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenerError {
    #[error("{0}")]
    Failed(String),
}

impl ListenerError {
    pub fn failed(msg: impl Into<String>) -> Self {
        ListenerError::Failed(msg.into())
    }
}

pub type ListenerResult<T> = Result<T, ListenerError>;
