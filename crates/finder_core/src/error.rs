use thiserror::Error;

/// Failure modes of a remote profile lookup.
///
/// Variants are clonable and carry owned detail so they can ride inside
/// broadcast events and be retained as the controller's last error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("github user '{username}' not found")]
    NotFound { username: String },
    #[error("profile request failed: {message}")]
    Transport { message: String },
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}
