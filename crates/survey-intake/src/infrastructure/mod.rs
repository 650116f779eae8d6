//! Infrastructure layer
//!
//! Adapters for the outbound ports.

pub mod http;
pub mod persistence;
pub mod zip_index;

pub use http::HttpSurveyStore;
pub use persistence::InMemorySurveyStore;
pub use zip_index::{DatasetError, ZipDataset, ZipIndex, ZipIndexHandle};
