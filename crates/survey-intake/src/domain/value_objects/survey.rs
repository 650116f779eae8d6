//! Survey draft, wire payload and confirmed record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{CampusLiked, FieldName, InterestSource, Recommendation, SurveyId};

/// In-progress survey as typed by the user.
///
/// Text fields hold the raw input, untrimmed. Typed fields are `None` until a
/// parseable value has been entered. The optional text fields stay `None`
/// until touched, so an empty string from a stored record survives a resubmit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SurveyDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub street_address: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub survey_date: Option<NaiveDate>,
    pub recommendation: Option<Recommendation>,
    pub campus_liked: BTreeSet<CampusLiked>,
    pub interest_source: Option<InterestSource>,
    pub comments: Option<String>,
}

impl SurveyDraft {
    /// Copy the editable fields of a confirmed record.
    pub fn from_record(record: &SurveyRecord) -> Self {
        let fields = &record.fields;
        Self {
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            email: fields.email.clone(),
            phone_number: fields.phone_number.clone(),
            street_address: fields.street_address.clone(),
            zip_code: fields.zip_code.clone(),
            city: fields.city.clone(),
            state: fields.state.clone(),
            survey_date: Some(fields.survey_date),
            recommendation: Some(fields.recommendation),
            campus_liked: fields.campus_liked.clone(),
            interest_source: Some(fields.interest_source),
            comments: fields.comments.clone(),
        }
    }

    /// Raw value of a text field; `None` for typed fields.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        let value = match field {
            FieldName::FirstName => &self.first_name,
            FieldName::LastName => &self.last_name,
            FieldName::Email => &self.email,
            FieldName::PhoneNumber => return Some(self.phone_number.as_deref().unwrap_or("")),
            FieldName::StreetAddress => &self.street_address,
            FieldName::ZipCode => &self.zip_code,
            FieldName::City => &self.city,
            FieldName::State => &self.state,
            FieldName::Comments => return Some(self.comments.as_deref().unwrap_or("")),
            FieldName::SurveyDate
            | FieldName::Recommendation
            | FieldName::CampusLiked
            | FieldName::InterestSource => return None,
        };
        Some(value.as_str())
    }

    pub(crate) fn text_mut(&mut self, field: FieldName) -> Option<&mut String> {
        match field {
            FieldName::FirstName => Some(&mut self.first_name),
            FieldName::LastName => Some(&mut self.last_name),
            FieldName::Email => Some(&mut self.email),
            FieldName::PhoneNumber => Some(self.phone_number.get_or_insert_with(String::new)),
            FieldName::StreetAddress => Some(&mut self.street_address),
            FieldName::ZipCode => Some(&mut self.zip_code),
            FieldName::City => Some(&mut self.city),
            FieldName::State => Some(&mut self.state),
            FieldName::Comments => Some(self.comments.get_or_insert_with(String::new)),
            _ => None,
        }
    }

    /// Build the wire body. Returns `None` while a required typed field is
    /// still missing; callers validate first.
    pub fn to_payload(&self) -> Option<SurveyPayload> {
        Some(SurveyPayload {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
            street_address: self.street_address.clone(),
            zip_code: self.zip_code.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            survey_date: self.survey_date?,
            recommendation: self.recommendation?,
            campus_liked: self.campus_liked.clone(),
            interest_source: self.interest_source?,
            comments: self.comments.clone(),
        })
    }

    pub fn is_blank(&self) -> bool {
        self == &Self::default()
    }
}

/// Create / update request body (draft sans identity and timestamps)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub street_address: String,
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub survey_date: NaiveDate,
    pub recommendation: Recommendation,
    #[serde(default)]
    pub campus_liked: BTreeSet<CampusLiked>,
    pub interest_source: InterestSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// Server-confirmed survey
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyRecord {
    pub id: SurveyId,
    #[serde(flatten)]
    pub fields: SurveyPayload,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SurveyRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.fields.first_name, self.fields.last_name)
    }
}
