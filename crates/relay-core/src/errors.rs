use crate::domain::MessageId;

/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type so the core can
/// decide what is surfaced to the sender/operator and what is only logged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("transport error: {0}")]
    Transport(String),

    /// Malformed operator command arguments. The message is shown to the operator as-is.
    #[error("{0}")]
    Usage(String),

    #[error("message link already registered for forwarded message {0:?}")]
    DuplicateLink(MessageId),
}

pub type Result<T> = std::result::Result<T, Error>;
