//! Aggregates

pub mod intake_form;

pub use intake_form::{FormError, FormState, IntakeForm, PendingSubmission, ZipLookupTicket};
