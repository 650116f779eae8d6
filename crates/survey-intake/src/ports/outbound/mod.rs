//! Outbound ports
//!
//! Hexagonal architecture: interfaces that infrastructure must implement.

use async_trait::async_trait;

use crate::domain::value_objects::{SurveyId, SurveyPayload, SurveyRecord, ZipCodeEntry};

/// ZIP → address resolution
///
/// Implementations fail closed: malformed input, a missing ZIP and an index
/// that is not ready all answer `None`.
pub trait AddressLookup: Send + Sync {
    fn lookup(&self, zip: &str) -> Option<ZipCodeEntry>;

    fn is_ready(&self) -> bool;
}

/// Remote survey record store (CRUD)
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Create a survey; the store assigns id and timestamps
    async fn create(&self, payload: &SurveyPayload) -> Result<SurveyRecord, StoreError>;

    /// List every survey
    async fn list(&self) -> Result<Vec<SurveyRecord>, StoreError>;

    /// Fetch a survey by id
    async fn get(&self, id: SurveyId) -> Result<SurveyRecord, StoreError>;

    /// Replace the editable fields of a survey
    async fn update(&self, id: SurveyId, payload: &SurveyPayload) -> Result<SurveyRecord, StoreError>;

    /// Delete a survey
    async fn delete(&self, id: SurveyId) -> Result<(), StoreError>;

    /// Total number of surveys
    async fn count(&self) -> Result<u64, StoreError>;
}

/// Record store error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("survey not found: {0}")]
    NotFound(SurveyId),

    #[error("rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Worth retrying the same request
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Server { .. } | Self::Transport(_))
    }
}
