//! Survey Intake Engine
//!
//! Client-side core for collecting prospective-student surveys: field
//! validation, ZIP → city/state auto-fill, and create/update sync against a
//! remote record store.
//!
//! ## Architecture
//!
//! - **Domain Layer**: value objects, the `IntakeForm` aggregate, field validators
//! - **Ports Layer**: `AddressLookup` and `SurveyStore` interfaces
//! - **Application Layer**: `SurveyRecordSync` (create-vs-update dispatch)
//! - **Infrastructure Layer**: ZIP index, HTTP and in-memory record stores
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use survey_intake::{FieldName, InMemorySurveyStore, IntakeForm, SurveyRecordSync, ZipIndex};
//!
//! # async fn run() -> Result<(), survey_intake::FormError> {
//! let index = Arc::new(ZipIndex::empty());
//! let sync = SurveyRecordSync::new(Arc::new(InMemorySurveyStore::new()));
//!
//! let mut form = IntakeForm::new(index);
//! form.edit_field(FieldName::ZipCode, "22030")?;
//! form.blur_zip()?;
//! let outcome = sync.submit(&mut form).await?;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ports;

pub use application::{PendingSubmission, SubmitOutcome, SurveyRecordSync, SyncError};
pub use config::{ConfigError, SyncConfig};
pub use domain::aggregates::{FormError, FormState, IntakeForm, ZipLookupTicket};
pub use domain::events::{DomainEvent, FormEvent, SyncEvent};
pub use domain::services::{ErrorKind, FieldValidity, Rule, ValidationState};
pub use domain::value_objects::{
    CampusLiked, FieldName, InterestSource, Recommendation, SurveyDraft, SurveyId,
    SurveyPayload, SurveyRecord, ZipCode, ZipCodeEntry,
};
pub use error::{Error, Result};
pub use infrastructure::{
    DatasetError, HttpSurveyStore, InMemorySurveyStore, ZipDataset, ZipIndex, ZipIndexHandle,
};
pub use ports::outbound::{AddressLookup, StoreError, SurveyStore};
