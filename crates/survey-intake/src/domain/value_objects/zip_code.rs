//! ZIP Code Value Object
//!
//! A ZIP code is canonicalised once, when it enters the system, to an integer
//! in `0..=99999`. It is always rendered zero-padded to five digits, so the
//! dataset's numeric `501` and the user's `"00501"` compare equal.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical 5-digit ZIP code
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZipCode(u32);

impl ZipCode {
    pub const LEN: usize = 5;
    pub const MAX: u32 = 99_999;

    /// Parse user or dataset text. Surrounding whitespace is ignored; the
    /// remainder must be exactly five ASCII digits.
    pub fn parse(input: &str) -> Result<Self, ZipCodeError> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        let len = trimmed.chars().count();
        if len != Self::LEN {
            return Err(ZipCodeError::WrongLength(len));
        }

        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ZipCodeError::NonNumeric);
        }

        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|_| ZipCodeError::NonNumeric)
    }

    /// Build from a numeric dataset value (leading zeros already lost).
    pub fn from_number(value: u64) -> Result<Self, ZipCodeError> {
        if value > u64::from(Self::MAX) {
            return Err(ZipCodeError::OutOfRange(value));
        }
        Ok(Self(value as u32))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:05}", self.0)
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ZipCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ZipCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawZip {
            Number(u64),
            Text(String),
        }

        match RawZip::deserialize(deserializer)? {
            RawZip::Number(n) => ZipCode::from_number(n).map_err(de::Error::custom),
            RawZip::Text(s) => ZipCode::parse(&s).map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZipCodeError {
    #[error("ZIP code is empty")]
    Empty,

    #[error("ZIP code must be 5 digits, got {0} characters")]
    WrongLength(usize),

    #[error("ZIP code must contain only digits")]
    NonNumeric,

    #[error("ZIP code {0} is out of range")]
    OutOfRange(u64),
}

/// One row of the ZIP reference dataset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZipCodeEntry {
    #[serde(alias = "zip_code")]
    pub zip: ZipCode,
    pub city: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ZipCodeEntry {
    pub fn new(zip: ZipCode, city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            zip,
            city: city.into(),
            state: state.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}
