//! Domain services
//!
//! Stateless validation logic over survey drafts.

pub mod validation;
pub mod validators;

pub use validation::{FieldValidity, ValidationState};
pub use validators::{
    check_field, email_shape, five_digits, letters_and_spaces, min_selection, required,
    rules_for, ErrorKind, FieldValue, Rule, MIN_CAMPUS_SELECTION,
};
