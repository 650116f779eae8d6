//! Application layer
//!
//! Orchestrates form submission and hydration against the record store.

pub mod sync;

pub use crate::domain::aggregates::PendingSubmission;
pub use sync::{SubmitOutcome, SurveyRecordSync, SyncError};
