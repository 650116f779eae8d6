//! Value Objects module
//!
//! Immutable, validated survey primitives.

pub mod choices;
pub mod survey;
pub mod zip_code;

pub use choices::{CampusLiked, InterestSource, ParseChoiceError, Recommendation};
pub use survey::{SurveyDraft, SurveyPayload, SurveyRecord};
pub use zip_code::{ZipCode, ZipCodeEntry, ZipCodeError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned survey identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurveyId(u64);

impl SurveyId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurveyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SurveyId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Every input field of the survey form, in form order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    StreetAddress,
    ZipCode,
    City,
    State,
    SurveyDate,
    Recommendation,
    CampusLiked,
    InterestSource,
    Comments,
}

impl FieldName {
    pub const ALL: [FieldName; 13] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::PhoneNumber,
        Self::StreetAddress,
        Self::ZipCode,
        Self::City,
        Self::State,
        Self::SurveyDate,
        Self::Recommendation,
        Self::CampusLiked,
        Self::InterestSource,
        Self::Comments,
    ];

    /// Wire / presentation name (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::StreetAddress => "streetAddress",
            Self::ZipCode => "zipCode",
            Self::City => "city",
            Self::State => "state",
            Self::SurveyDate => "surveyDate",
            Self::Recommendation => "recommendation",
            Self::CampusLiked => "campusLiked",
            Self::InterestSource => "interestSource",
            Self::Comments => "comments",
        }
    }

    /// Fields stored as raw strings in the draft
    pub fn is_text(&self) -> bool {
        !matches!(
            self,
            Self::SurveyDate | Self::Recommendation | Self::CampusLiked | Self::InterestSource
        )
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_name_round_trips_through_str() {
        for field in FieldName::ALL {
            assert_eq!(field.as_str().parse::<FieldName>().unwrap(), field);
        }
        assert!("zip".parse::<FieldName>().is_err());
    }

    #[test]
    fn test_text_fields() {
        assert!(FieldName::City.is_text());
        assert!(FieldName::Comments.is_text());
        assert!(!FieldName::CampusLiked.is_text());
        assert!(!FieldName::SurveyDate.is_text());
    }

    #[test]
    fn test_survey_id_is_transparent_on_the_wire() {
        let id: SurveyId = serde_json::from_str("5").unwrap();
        assert_eq!(id, SurveyId::new(5));
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
    }
}
