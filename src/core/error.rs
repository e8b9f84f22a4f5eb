use thiserror::Error;

/// Errors surfaced by the chat core and its gateway.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A post arrived for a token that never fetched. Callers must fetch first.
    #[error("unknown session token; fetch messages before posting")]
    UnknownToken,
    /// A configuration value could not be used.
    #[error("invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChatError>;
