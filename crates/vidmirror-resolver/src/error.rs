use thiserror::Error;

/// Resolver operation errors
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid video id: {0}")]
    InvalidId(String),

    #[error("Video {id} unavailable: {reason}")]
    Unavailable { id: String, reason: String },

    #[error("No stream format matches the requested quality: {requested}")]
    NoMatchingFormat { requested: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse player response: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
