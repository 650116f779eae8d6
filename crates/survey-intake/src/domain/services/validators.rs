//! Field validators
//!
//! Plain predicates over field values, composed per field in a fixed table.
//! Every predicate is pure: `(value) -> Ok(()) | Err(ErrorKind)`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::domain::value_objects::{FieldName, SurveyDraft};

/// Minimum number of campus categories a submission must select.
pub const MIN_CAMPUS_SELECTION: usize = 2;

const MAX_EMAIL_LEN: usize = 254;
const MAX_EMAIL_LOCAL_LEN: usize = 64;

static LETTERS_AND_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("static regex"));

static EMAIL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%\&'*+/=?^_`{|}\~\-]+(?:\.[A-Za-z0-9!#$%\&'*+/=?^_`{|}\~\-]+)*",
        r"@[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]{0,61}[A-Za-z0-9])?)*$",
    ))
    .expect("static regex")
});

/// Field-level validation failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    Required,
    Pattern,
    Format,
    MinSelection,
}

impl ErrorKind {
    /// User-facing message for this error on `field`
    pub fn message(&self, field: FieldName) -> String {
        match self {
            Self::Required => "This field is required".to_string(),
            Self::Format => "Please enter a valid email address".to_string(),
            Self::Pattern => match field {
                FieldName::FirstName | FieldName::LastName => {
                    "Only letters and spaces are allowed".to_string()
                }
                FieldName::ZipCode => "ZIP code must be 5 digits".to_string(),
                _ => "Invalid value".to_string(),
            },
            Self::MinSelection => {
                format!("At least {} options must be selected", MIN_CAMPUS_SELECTION)
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "REQUIRED"),
            Self::Pattern => write!(f, "PATTERN"),
            Self::Format => write!(f, "FORMAT"),
            Self::MinSelection => write!(f, "MIN_SELECTION"),
        }
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// Present and not blank.
pub fn required(value: &str) -> Result<(), ErrorKind> {
    if value.trim().is_empty() {
        Err(ErrorKind::Required)
    } else {
        Ok(())
    }
}

pub fn letters_and_spaces(value: &str) -> Result<(), ErrorKind> {
    if LETTERS_AND_SPACES.is_match(value) {
        Ok(())
    } else {
        Err(ErrorKind::Pattern)
    }
}

pub fn email_shape(value: &str) -> Result<(), ErrorKind> {
    let local_len = value.split('@').next().map(str::len).unwrap_or(0);
    if value.len() > MAX_EMAIL_LEN || local_len > MAX_EMAIL_LOCAL_LEN {
        return Err(ErrorKind::Format);
    }
    if EMAIL_SHAPE.is_match(value) {
        Ok(())
    } else {
        Err(ErrorKind::Format)
    }
}

/// Exactly five ASCII digits, nothing else.
pub fn five_digits(value: &str) -> Result<(), ErrorKind> {
    if value.len() == 5 && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ErrorKind::Pattern)
    }
}

/// Cross-field rule: at least `min` categories selected.
pub fn min_selection(selected: usize, min: usize) -> Result<(), ErrorKind> {
    if selected < min {
        Err(ErrorKind::MinSelection)
    } else {
        Ok(())
    }
}

// =============================================================================
// Rule table
// =============================================================================

/// A field value as the validators see it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Choice(bool),
    Selection(usize),
}

impl<'a> FieldValue<'a> {
    pub fn of(draft: &'a SurveyDraft, field: FieldName) -> Self {
        match field {
            FieldName::SurveyDate => Self::Choice(draft.survey_date.is_some()),
            FieldName::Recommendation => Self::Choice(draft.recommendation.is_some()),
            FieldName::InterestSource => Self::Choice(draft.interest_source.is_some()),
            FieldName::CampusLiked => Self::Selection(draft.campus_liked.len()),
            text => Self::Text(draft.text(text).unwrap_or_default()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Required,
    LettersAndSpaces,
    EmailShape,
    FiveDigits,
    MinSelection(usize),
}

impl Rule {
    pub fn check(&self, value: FieldValue<'_>) -> Result<(), ErrorKind> {
        match (self, value) {
            (Self::Required, FieldValue::Text(s)) => required(s),
            (Self::Required, FieldValue::Choice(present)) => {
                if present { Ok(()) } else { Err(ErrorKind::Required) }
            }
            (Self::Required, FieldValue::Selection(n)) => {
                if n > 0 { Ok(()) } else { Err(ErrorKind::Required) }
            }
            (Self::LettersAndSpaces, FieldValue::Text(s)) => letters_and_spaces(s),
            (Self::EmailShape, FieldValue::Text(s)) => email_shape(s),
            (Self::FiveDigits, FieldValue::Text(s)) => five_digits(s),
            (Self::MinSelection(min), FieldValue::Selection(n)) => min_selection(n, *min),
            _ => Ok(()),
        }
    }
}

/// Rules applied to `field`, in evaluation order.
pub fn rules_for(field: FieldName) -> &'static [Rule] {
    const NAME: &[Rule] = &[Rule::Required, Rule::LettersAndSpaces];
    const EMAIL: &[Rule] = &[Rule::Required, Rule::EmailShape];
    const ZIP: &[Rule] = &[Rule::Required, Rule::FiveDigits];
    const REQUIRED: &[Rule] = &[Rule::Required];
    const CAMPUS: &[Rule] = &[Rule::Required, Rule::MinSelection(MIN_CAMPUS_SELECTION)];
    const NONE: &[Rule] = &[];

    match field {
        FieldName::FirstName | FieldName::LastName => NAME,
        FieldName::Email => EMAIL,
        FieldName::StreetAddress => REQUIRED,
        FieldName::ZipCode => ZIP,
        FieldName::City | FieldName::State => REQUIRED,
        FieldName::SurveyDate => REQUIRED,
        FieldName::Recommendation | FieldName::InterestSource => REQUIRED,
        FieldName::CampusLiked => CAMPUS,
        FieldName::PhoneNumber | FieldName::Comments => NONE,
    }
}

/// Every failing rule for `field`, in table order. A missing value stops at
/// REQUIRED.
pub fn check_field(draft: &SurveyDraft, field: FieldName) -> Vec<ErrorKind> {
    let value = FieldValue::of(draft, field);
    let mut errors = Vec::new();
    for rule in rules_for(field) {
        if let Err(kind) = rule.check(value) {
            errors.push(kind);
            if kind == ErrorKind::Required {
                break;
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required(""), Err(ErrorKind::Required));
        assert_eq!(required("  \t"), Err(ErrorKind::Required));
        assert_eq!(required("x"), Ok(()));
    }

    #[test]
    fn test_letters_and_spaces() {
        assert_eq!(letters_and_spaces("Mary Ann"), Ok(()));
        assert_eq!(letters_and_spaces("O'Brien"), Err(ErrorKind::Pattern));
        assert_eq!(letters_and_spaces("R2D2"), Err(ErrorKind::Pattern));
        assert_eq!(letters_and_spaces("José"), Err(ErrorKind::Pattern));
    }

    #[test]
    fn test_email_shape() {
        assert_eq!(email_shape("student@gmu.edu"), Ok(()));
        assert_eq!(email_shape("first.last+tag@mail.example.org"), Ok(()));
        assert_eq!(email_shape("user@localhost"), Ok(()));
        assert_eq!(email_shape("no-at-sign"), Err(ErrorKind::Format));
        assert_eq!(email_shape("two@@example.com"), Err(ErrorKind::Format));
        assert_eq!(email_shape("trailing.dot.@example.com"), Err(ErrorKind::Format));
        assert_eq!(email_shape("user@-bad.com"), Err(ErrorKind::Format));
        assert_eq!(email_shape("user@"), Err(ErrorKind::Format));
        assert_eq!(email_shape(" user@example.com"), Err(ErrorKind::Format));
    }

    #[test]
    fn test_email_length_limits() {
        let long_local = format!("{}@example.com", "a".repeat(65));
        assert_eq!(email_shape(&long_local), Err(ErrorKind::Format));
        let long_domain = format!("a@{}.com", "b".repeat(60).repeat(5));
        assert_eq!(email_shape(&long_domain), Err(ErrorKind::Format));
    }

    #[test]
    fn test_five_digits() {
        assert_eq!(five_digits("22030"), Ok(()));
        assert_eq!(five_digits("00501"), Ok(()));
        assert_eq!(five_digits("2203"), Err(ErrorKind::Pattern));
        assert_eq!(five_digits(" 22030"), Err(ErrorKind::Pattern));
        assert_eq!(five_digits("22O30"), Err(ErrorKind::Pattern));
    }

    #[test]
    fn test_min_selection() {
        assert_eq!(min_selection(1, 2), Err(ErrorKind::MinSelection));
        assert_eq!(min_selection(2, 2), Ok(()));
        assert_eq!(min_selection(6, 2), Ok(()));
    }

    #[test]
    fn test_check_field_stops_at_required() {
        let draft = SurveyDraft::default();
        assert_eq!(check_field(&draft, FieldName::FirstName), vec![ErrorKind::Required]);
        assert_eq!(check_field(&draft, FieldName::CampusLiked), vec![ErrorKind::Required]);
        assert!(check_field(&draft, FieldName::Comments).is_empty());
        assert!(check_field(&draft, FieldName::PhoneNumber).is_empty());
    }

    #[test]
    fn test_check_field_reports_pattern_after_required_passes() {
        let draft = SurveyDraft {
            zip_code: "2203x".into(),
            email: "nope".into(),
            ..Default::default()
        };
        assert_eq!(check_field(&draft, FieldName::ZipCode), vec![ErrorKind::Pattern]);
        assert_eq!(check_field(&draft, FieldName::Email), vec![ErrorKind::Format]);
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorKind::Pattern.message(FieldName::ZipCode), "ZIP code must be 5 digits");
        assert_eq!(
            ErrorKind::Pattern.message(FieldName::LastName),
            "Only letters and spaces are allowed"
        );
        assert_eq!(
            ErrorKind::MinSelection.message(FieldName::CampusLiked),
            "At least 2 options must be selected"
        );
    }
}
