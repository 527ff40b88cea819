use thiserror::Error;

/// Failures that end a producer or consumer session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to listen on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),
}
