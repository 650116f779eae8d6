//! Closed choice sets offered by the survey form.
//!
//! On the wire each variant is its SCREAMING_SNAKE_CASE tag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How likely the student is to recommend the school
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    VeryLikely,
    Likely,
    Unlikely,
}

impl Recommendation {
    pub const ALL: [Recommendation; 3] = [Self::VeryLikely, Self::Likely, Self::Unlikely];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLikely => "VERY_LIKELY",
            Self::Likely => "LIKELY",
            Self::Unlikely => "UNLIKELY",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::VeryLikely => "Very Likely",
            Self::Likely => "Likely",
            Self::Unlikely => "Unlikely",
        }
    }
}

/// What the student liked most about the campus
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampusLiked {
    Students,
    Location,
    Campus,
    Atmosphere,
    DormRooms,
    Sports,
}

impl CampusLiked {
    pub const ALL: [CampusLiked; 6] = [
        Self::Students,
        Self::Location,
        Self::Campus,
        Self::Atmosphere,
        Self::DormRooms,
        Self::Sports,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Students => "STUDENTS",
            Self::Location => "LOCATION",
            Self::Campus => "CAMPUS",
            Self::Atmosphere => "ATMOSPHERE",
            Self::DormRooms => "DORM_ROOMS",
            Self::Sports => "SPORTS",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::Location => "Location",
            Self::Campus => "Campus",
            Self::Atmosphere => "Atmosphere",
            Self::DormRooms => "Dorm Rooms",
            Self::Sports => "Sports",
        }
    }
}

/// How the student became interested in the university
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestSource {
    Friends,
    Television,
    Internet,
    Other,
}

impl InterestSource {
    pub const ALL: [InterestSource; 4] =
        [Self::Friends, Self::Television, Self::Internet, Self::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friends => "FRIENDS",
            Self::Television => "TELEVISION",
            Self::Internet => "INTERNET",
            Self::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Friends => "Friends",
            Self::Television => "Television",
            Self::Internet => "Internet",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CampusLiked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InterestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| ParseChoiceError::new("recommendation", tag))
    }
}

impl FromStr for CampusLiked {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| ParseChoiceError::new("campusLiked", tag))
    }
}

impl FromStr for InterestSource {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == tag)
            .ok_or_else(|| ParseChoiceError::new("interestSource", tag))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {kind} option")]
pub struct ParseChoiceError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseChoiceError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}
