use thiserror::Error;

/// Custom Error and Result types to unify errors from all sources.
pub type LbResult<T> = Result<T, LeaderboardError>;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    /// Unresolvable map, or a lookup for a user absent from the structure.
    #[error("Not Found: {0}")]
    NotFound(String),

    /// The backing score query failed.
    #[error("Score Store Unavailable: {0}")]
    StoreUnavailable(String),

    /// Upstream map metadata that does not match the requested map.
    #[error("Metadata Error: {0}")]
    Metadata(String),

    #[error("Configuration Error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for LeaderboardError {
    fn from(error: figment::Error) -> Self {
        LeaderboardError::Config(Box::new(error))
    }
}
