use thermofuse_core::ConfigError;
use thiserror::Error;

/// Result type for the stream interceptor
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Interceptor failures
///
/// Per-line problems (malformed records, unreadable sensors) are handled
/// inside the stream and never surface here.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}
