//! Crate error type

use crate::application::SyncError;
use crate::config::ConfigError;
use crate::domain::aggregates::FormError;
use crate::infrastructure::DatasetError;
use crate::ports::outbound::StoreError;

/// Result type alias for survey intake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure surfaced by the survey intake library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
