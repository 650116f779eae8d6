//! Intake Form Aggregate
//!
//! Owns one survey draft for one form session, together with its touched
//! flags, lifecycle state and user-facing messages. Every mutation goes
//! through a method here; validity is derived on demand.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::events::{DomainEvent, FormEvent};
use crate::domain::services::{check_field, ErrorKind, ValidationState};
use crate::domain::value_objects::{
    CampusLiked, FieldName, SurveyDraft, SurveyId, SurveyPayload, SurveyRecord, ZipCode,
    ZipCodeEntry,
};
use crate::ports::outbound::AddressLookup;

pub const MSG_INVALID_FORM: &str = "Please fill in all required fields correctly.";
pub const MSG_CREATED: &str = "Survey submitted successfully! Thank you for your feedback.";
pub const MSG_UPDATED: &str = "Survey updated successfully!";
pub const MSG_CREATE_FAILED: &str = "Failed to submit survey. Please try again.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update survey. Please try again.";
pub const MSG_LOAD_FAILED: &str = "Failed to load survey data";

/// Lifecycle of a form session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FormState {
    /// Create mode, nothing entered yet
    Empty,
    /// Edit mode, waiting for the stored record
    Loading,
    Ready,
    /// Submit in flight; the form is locked
    Submitting,
    /// Terminal for this draft instance
    Succeeded,
    /// Last submit failed; draft kept, editable again
    Failed,
}

impl FormState {
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Empty | Self::Ready | Self::Failed)
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "EMPTY",
            Self::Loading => "LOADING",
            Self::Ready => "READY",
            Self::Submitting => "SUBMITTING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Handle for one ZIP lookup. Only the most recently issued ticket may
/// write its result into the draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZipLookupTicket {
    seq: u64,
    zip: ZipCode,
}

impl ZipLookupTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn zip(&self) -> ZipCode {
        self.zip
    }
}

/// A validated draft ready to leave the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingSubmission {
    /// Present in edit mode
    pub id: Option<SurveyId>,
    pub payload: SurveyPayload,
}

/// Survey intake form aggregate root
pub struct IntakeForm {
    lookup: Arc<dyn AddressLookup>,
    state: FormState,
    draft: SurveyDraft,
    touched: BTreeSet<FieldName>,
    submitted: bool,
    survey_id: Option<SurveyId>,
    record: Option<SurveyRecord>,
    success_message: Option<String>,
    error_message: Option<String>,
    zip_seq: u64,
    events: Vec<DomainEvent>,
}

impl IntakeForm {
    /// New form in create mode
    pub fn new(lookup: Arc<dyn AddressLookup>) -> Self {
        Self {
            lookup,
            state: FormState::Empty,
            draft: SurveyDraft::default(),
            touched: BTreeSet::new(),
            submitted: false,
            survey_id: None,
            record: None,
            success_message: None,
            error_message: None,
            zip_seq: 0,
            events: vec![],
        }
    }

    // =========================================================================
    // Read access for the presentation layer
    // =========================================================================

    pub fn state(&self) -> FormState { self.state }
    pub fn draft(&self) -> &SurveyDraft { &self.draft }
    pub fn survey_id(&self) -> Option<SurveyId> { self.survey_id }
    pub fn is_edit_mode(&self) -> bool { self.survey_id.is_some() }
    pub fn record(&self) -> Option<&SurveyRecord> { self.record.as_ref() }
    pub fn submitted(&self) -> bool { self.submitted }
    pub fn success_message(&self) -> Option<&str> { self.success_message.as_deref() }
    pub fn error_message(&self) -> Option<&str> { self.error_message.as_deref() }
    pub fn is_touched(&self, field: FieldName) -> bool { self.touched.contains(&field) }
    pub fn lookup_ready(&self) -> bool { self.lookup.is_ready() }

    pub fn is_category_selected(&self, value: CampusLiked) -> bool {
        self.draft.campus_liked.contains(&value)
    }

    /// Full validation of every field, regardless of touched state.
    pub fn validate(&self) -> ValidationState {
        ValidationState::evaluate(&self.draft, &self.touched)
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// First failing rule for `field`, touched or not.
    pub fn error_for(&self, field: FieldName) -> Option<ErrorKind> {
        check_field(&self.draft, field).first().copied()
    }

    /// Error to display: only once the field was touched or a submit was attempted.
    pub fn visible_error(&self, field: FieldName) -> Option<ErrorKind> {
        if self.submitted || self.touched.contains(&field) {
            self.error_for(field)
        } else {
            None
        }
    }

    pub fn visible_error_message(&self, field: FieldName) -> Option<String> {
        self.visible_error(field).map(|kind| kind.message(field))
    }

    // =========================================================================
    // Edit mode hydration
    // =========================================================================

    /// Switch to edit mode and wait for the stored record.
    pub fn begin_loading(&mut self, id: SurveyId) -> Result<(), FormError> {
        if self.state == FormState::Submitting {
            return Err(FormError::SubmitInFlight);
        }
        self.clear();
        self.survey_id = Some(id);
        self.state = FormState::Loading;
        debug!(survey_id = %id, "loading survey for edit");
        Ok(())
    }

    /// Copy the fetched record into the draft. No validation runs here.
    pub fn hydrate(&mut self, record: SurveyRecord) -> Result<(), FormError> {
        if self.state != FormState::Loading {
            return Err(FormError::InvalidTransition { from: self.state, action: "hydrate" });
        }
        if self.survey_id != Some(record.id) {
            return Err(FormError::RecordMismatch { expected: self.survey_id, actual: record.id });
        }

        self.draft = SurveyDraft::from_record(&record);
        self.record = Some(record);
        self.state = FormState::Ready;
        info!(survey_id = ?self.survey_id, "survey hydrated for edit");
        Ok(())
    }

    /// The record could not be fetched; drop back to an empty create form.
    pub fn fail_loading(&mut self, cause: impl fmt::Display) -> Result<(), FormError> {
        if self.state != FormState::Loading {
            return Err(FormError::InvalidTransition { from: self.state, action: "fail_loading" });
        }
        warn!(survey_id = ?self.survey_id, error = %cause, "failed to load survey");
        self.clear();
        self.state = FormState::Empty;
        self.error_message = Some(MSG_LOAD_FAILED.to_string());
        Ok(())
    }

    // =========================================================================
    // User input
    // =========================================================================

    /// Set a field from raw input and mark it touched.
    ///
    /// Text fields keep the input verbatim. `surveyDate` takes `YYYY-MM-DD`,
    /// choice fields take their wire tag and `campusLiked` a comma-separated
    /// tag list; unparseable input leaves the field empty. Never triggers a
    /// ZIP lookup.
    pub fn edit_field(&mut self, field: FieldName, value: &str) -> Result<(), FormError> {
        self.ensure_editable()?;

        match field {
            FieldName::SurveyDate => {
                self.draft.survey_date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok();
            }
            FieldName::Recommendation => {
                self.draft.recommendation = value.parse().ok();
            }
            FieldName::InterestSource => {
                self.draft.interest_source = value.parse().ok();
            }
            FieldName::CampusLiked => {
                self.draft.campus_liked = parse_categories(value);
            }
            text => {
                if let Some(slot) = self.draft.text_mut(text) {
                    *slot = value.to_string();
                }
            }
        }

        self.touched.insert(field);
        debug!(%field, error = ?self.error_for(field), "field edited");
        Ok(())
    }

    /// Focus left `field`.
    pub fn touch(&mut self, field: FieldName) {
        self.touched.insert(field);
    }

    /// Add `value` if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle_category(&mut self, value: CampusLiked) -> Result<bool, FormError> {
        self.ensure_editable()?;

        let selected = if self.draft.campus_liked.remove(&value) {
            false
        } else {
            self.draft.campus_liked.insert(value);
            true
        };
        self.touched.insert(FieldName::CampusLiked);
        debug!(category = %value, selected, "category toggled");
        Ok(selected)
    }

    /// ZIP field lost focus: resolve city/state against the lookup index.
    ///
    /// Idempotent for an unchanged ZIP; a later call always overwrites an
    /// earlier one.
    pub fn blur_zip(&mut self) -> Result<Option<ZipCodeEntry>, FormError> {
        let Some(ticket) = self.begin_zip_lookup()? else {
            return Ok(None);
        };
        let found = self.lookup.lookup(&ticket.zip.to_string());
        self.apply_zip_lookup(&ticket, found.clone());
        Ok(found)
    }

    /// First half of a ZIP lookup, for callers resolving asynchronously.
    ///
    /// Trims the ZIP in place and issues a new ticket, invalidating every
    /// earlier one. Malformed input clears city/state at once and yields no
    /// ticket.
    pub fn begin_zip_lookup(&mut self) -> Result<Option<ZipLookupTicket>, FormError> {
        self.ensure_editable()?;

        let trimmed = self.draft.zip_code.trim().to_string();
        self.draft.zip_code = trimmed;
        self.touched.insert(FieldName::ZipCode);
        self.zip_seq += 1;

        match ZipCode::parse(&self.draft.zip_code) {
            Ok(zip) => Ok(Some(ZipLookupTicket { seq: self.zip_seq, zip })),
            Err(reason) => {
                debug!(zip = %self.draft.zip_code, %reason, "zip not looked up");
                self.clear_address();
                Ok(None)
            }
        }
    }

    /// Second half of a ZIP lookup. Stale tickets are discarded and `false`
    /// is returned.
    pub fn apply_zip_lookup(
        &mut self,
        ticket: &ZipLookupTicket,
        result: Option<ZipCodeEntry>,
    ) -> bool {
        if ticket.seq != self.zip_seq {
            debug!(seq = ticket.seq, latest = self.zip_seq, "discarding stale zip lookup");
            return false;
        }
        if !self.state.is_editable() {
            debug!(state = %self.state, "discarding zip lookup for locked form");
            return false;
        }

        match result {
            Some(entry) => {
                self.draft.city = entry.city.clone();
                self.draft.state = entry.state.clone();
                debug!(zip = %entry.zip, city = %entry.city, state = %entry.state, "zip resolved");
                self.raise_event(DomainEvent::Form(FormEvent::ZipResolved {
                    zip: entry.zip,
                    city: entry.city,
                    state: entry.state,
                }));
            }
            None => {
                debug!(zip = %ticket.zip, ready = self.lookup.is_ready(), "zip not found");
                self.clear_address();
            }
        }
        true
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Validate everything and, if clean, lock the form for submission.
    ///
    /// On validation failure every field is marked touched, the form stays
    /// editable and nothing leaves the form.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, FormError> {
        match self.state {
            FormState::Submitting => return Err(FormError::SubmitInFlight),
            FormState::Loading | FormState::Succeeded => return Err(FormError::Locked(self.state)),
            _ => {}
        }

        self.submitted = true;
        self.success_message = None;
        self.error_message = None;

        let payload = match self.draft.to_payload() {
            Some(payload) if self.is_valid() => payload,
            _ => return Err(self.reject_submit()),
        };

        self.state = FormState::Submitting;
        info!(survey_id = ?self.survey_id, "survey submitted");
        self.raise_event(DomainEvent::Form(FormEvent::Submitted { id: self.survey_id }));
        Ok(PendingSubmission { id: self.survey_id, payload })
    }

    /// Reflect the store's answer back into the form.
    pub fn complete_submit<E: fmt::Display>(
        &mut self,
        result: Result<SurveyRecord, E>,
    ) -> Result<(), FormError> {
        if self.state != FormState::Submitting {
            return Err(FormError::InvalidTransition { from: self.state, action: "complete_submit" });
        }

        let editing = self.survey_id.is_some();
        match result {
            Ok(record) => {
                let id = record.id;
                if editing {
                    self.draft = SurveyDraft::from_record(&record);
                    self.success_message = Some(MSG_UPDATED.to_string());
                } else {
                    self.draft = SurveyDraft::default();
                    self.touched.clear();
                    self.submitted = false;
                    self.success_message = Some(MSG_CREATED.to_string());
                }
                self.record = Some(record);
                self.state = FormState::Succeeded;
                info!(survey_id = %id, created = !editing, "survey synced");
                self.raise_event(DomainEvent::Form(FormEvent::Synced { id, created: !editing }));
            }
            Err(err) => {
                warn!(survey_id = ?self.survey_id, error = %err, "survey sync failed");
                self.error_message = Some(
                    if editing { MSG_UPDATE_FAILED } else { MSG_CREATE_FAILED }.to_string(),
                );
                self.state = FormState::Failed;
                self.raise_event(DomainEvent::Form(FormEvent::SyncFailed { id: self.survey_id }));
            }
        }
        Ok(())
    }

    /// Back to an empty create form, from any state.
    pub fn reset(&mut self) {
        self.clear();
        self.state = FormState::Empty;
        debug!("form reset");
        self.raise_event(DomainEvent::Form(FormEvent::Reset));
    }

    // =========================================================================
    // Domain Events
    // =========================================================================

    /// Get and clear accumulated domain events
    pub fn take_events(&mut self) -> Vec<DomainEvent> {
        std::mem::take(&mut self.events)
    }

    fn raise_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_editable(&mut self) -> Result<(), FormError> {
        if self.state.is_editable() {
            self.state = FormState::Ready;
            Ok(())
        } else {
            Err(FormError::Locked(self.state))
        }
    }

    fn reject_submit(&mut self) -> FormError {
        self.touched.extend(FieldName::ALL);
        self.state = FormState::Ready;
        self.error_message = Some(MSG_INVALID_FORM.to_string());

        let validation = self.validate();
        let invalid_fields = validation.invalid_fields().len();
        warn!(invalid_fields, "submit rejected by validation");
        self.raise_event(DomainEvent::Form(FormEvent::SubmitRejected { invalid_fields }));
        FormError::Invalid(validation)
    }

    fn clear_address(&mut self) {
        self.draft.city.clear();
        self.draft.state.clear();
        self.raise_event(DomainEvent::Form(FormEvent::ZipCleared {
            input: self.draft.zip_code.clone(),
        }));
    }

    fn clear(&mut self) {
        self.draft = SurveyDraft::default();
        self.touched.clear();
        self.submitted = false;
        self.survey_id = None;
        self.record = None;
        self.success_message = None;
        self.error_message = None;
        // in-flight lookups belong to the discarded draft
        self.zip_seq += 1;
    }
}

impl fmt::Debug for IntakeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntakeForm")
            .field("state", &self.state)
            .field("survey_id", &self.survey_id)
            .field("draft", &self.draft)
            .field("touched", &self.touched)
            .field("submitted", &self.submitted)
            .finish_non_exhaustive()
    }
}

fn parse_categories(value: &str) -> BTreeSet<CampusLiked> {
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .filter_map(|tag| match tag.parse::<CampusLiked>() {
            Ok(category) => Some(category),
            Err(err) => {
                debug!(%err, "ignoring unknown category");
                None
            }
        })
        .collect()
}

/// Intake form error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form is locked while {0}")]
    Locked(FormState),

    #[error("a submit is already in flight")]
    SubmitInFlight,

    #[error("cannot {action} while {from}")]
    InvalidTransition { from: FormState, action: &'static str },

    #[error("loaded survey {actual} does not match the survey being edited ({expected:?})")]
    RecordMismatch { expected: Option<SurveyId>, actual: SurveyId },

    #[error("{} field(s) failed validation", .0.invalid_fields().len())]
    Invalid(ValidationState),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{InterestSource, Recommendation};
    use crate::infrastructure::ZipIndex;
    use chrono::NaiveDateTime;

    fn fairfax_index() -> Arc<ZipIndex> {
        let zip = ZipCode::parse("22030").unwrap();
        Arc::new(ZipIndex::load(vec![ZipCodeEntry::new(zip, "Fairfax", "VA")]))
    }

    fn new_form() -> IntakeForm {
        IntakeForm::new(fairfax_index())
    }

    fn fill_valid(form: &mut IntakeForm) {
        form.edit_field(FieldName::FirstName, "Ada").unwrap();
        form.edit_field(FieldName::LastName, "Lovelace").unwrap();
        form.edit_field(FieldName::Email, "ada@gmu.edu").unwrap();
        form.edit_field(FieldName::StreetAddress, "4400 University Dr").unwrap();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        form.blur_zip().unwrap();
        form.edit_field(FieldName::SurveyDate, "2024-10-01").unwrap();
        form.edit_field(FieldName::Recommendation, "LIKELY").unwrap();
        form.edit_field(FieldName::InterestSource, "FRIENDS").unwrap();
        form.toggle_category(CampusLiked::Students).unwrap();
        form.toggle_category(CampusLiked::Campus).unwrap();
    }

    fn stored_record(id: u64) -> SurveyRecord {
        let mut form = new_form();
        fill_valid(&mut form);
        let at = NaiveDateTime::parse_from_str("2024-10-01T09:00:00", "%Y-%m-%dT%H:%M:%S").unwrap();
        SurveyRecord {
            id: SurveyId::new(id),
            fields: form.draft().to_payload().unwrap(),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_new_form_is_empty() {
        let form = new_form();
        assert_eq!(form.state(), FormState::Empty);
        assert!(form.draft().is_blank());
        assert!(!form.is_edit_mode());
        assert!(form.lookup_ready());
    }

    #[test]
    fn test_edit_marks_touched_and_moves_to_ready() {
        let mut form = new_form();
        assert_eq!(form.visible_error(FieldName::FirstName), None);

        form.edit_field(FieldName::FirstName, "R2D2").unwrap();
        assert_eq!(form.state(), FormState::Ready);
        assert!(form.is_touched(FieldName::FirstName));
        assert_eq!(form.visible_error(FieldName::FirstName), Some(ErrorKind::Pattern));
        assert_eq!(
            form.visible_error_message(FieldName::FirstName).as_deref(),
            Some("Only letters and spaces are allowed")
        );
        // untouched fields stay quiet even though they are invalid
        assert_eq!(form.error_for(FieldName::LastName), Some(ErrorKind::Required));
        assert_eq!(form.visible_error(FieldName::LastName), None);
    }

    #[test]
    fn test_typed_fields_parse_or_clear() {
        let mut form = new_form();
        form.edit_field(FieldName::SurveyDate, "2024-02-30").unwrap();
        assert_eq!(form.draft().survey_date, None);
        form.edit_field(FieldName::SurveyDate, "2024-02-29").unwrap();
        assert!(form.draft().survey_date.is_some());

        form.edit_field(FieldName::Recommendation, "MAYBE").unwrap();
        assert_eq!(form.draft().recommendation, None);
        form.edit_field(FieldName::Recommendation, "VERY_LIKELY").unwrap();
        assert_eq!(form.draft().recommendation, Some(Recommendation::VeryLikely));

        form.edit_field(FieldName::InterestSource, "INTERNET").unwrap();
        assert_eq!(form.draft().interest_source, Some(InterestSource::Internet));

        form.edit_field(FieldName::CampusLiked, "SPORTS, BOGUS ,CAMPUS,SPORTS").unwrap();
        assert_eq!(form.draft().campus_liked.len(), 2);
    }

    #[test]
    fn test_blur_zip_fills_city_and_state() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        assert_eq!(form.draft().city, "", "editing the zip alone must not look up");

        let found = form.blur_zip().unwrap();
        assert!(found.is_some());
        assert_eq!(form.draft().city, "Fairfax");
        assert_eq!(form.draft().state, "VA");

        let events = form.take_events();
        assert!(matches!(events.last(), Some(DomainEvent::Form(FormEvent::ZipResolved { .. }))));
    }

    #[test]
    fn test_blur_zip_trims_input() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "  22030 ").unwrap();
        form.blur_zip().unwrap();
        assert_eq!(form.draft().zip_code, "22030");
        assert_eq!(form.draft().city, "Fairfax");
        assert_eq!(form.error_for(FieldName::ZipCode), None);
    }

    #[test]
    fn test_blur_zip_clears_on_unknown_or_malformed() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        form.blur_zip().unwrap();

        form.edit_field(FieldName::ZipCode, "00000").unwrap();
        assert_eq!(form.blur_zip().unwrap(), None);
        assert_eq!(form.draft().city, "");
        assert_eq!(form.draft().state, "");

        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        form.blur_zip().unwrap();
        form.edit_field(FieldName::ZipCode, "220").unwrap();
        assert_eq!(form.blur_zip().unwrap(), None);
        assert_eq!(form.draft().city, "");
    }

    #[test]
    fn test_blur_zip_is_idempotent() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        let first = form.blur_zip().unwrap();
        let draft = form.draft().clone();
        let second = form.blur_zip().unwrap();
        assert_eq!(first, second);
        assert_eq!(form.draft(), &draft);
    }

    #[test]
    fn test_city_override_survives_until_next_blur() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        form.blur_zip().unwrap();
        form.edit_field(FieldName::City, "City of Fairfax").unwrap();
        assert_eq!(form.draft().city, "City of Fairfax");
        assert_eq!(form.draft().state, "VA");

        form.blur_zip().unwrap();
        assert_eq!(form.draft().city, "Fairfax");
    }

    #[test]
    fn test_stale_async_lookup_is_discarded() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        let first = form.begin_zip_lookup().unwrap().unwrap();

        form.edit_field(FieldName::ZipCode, "99999").unwrap();
        let second = form.begin_zip_lookup().unwrap().unwrap();
        assert!(second.seq() > first.seq());

        // the newer request resolves first, then the stale one arrives
        assert!(form.apply_zip_lookup(&second, None));
        let stale = ZipCodeEntry::new(first.zip(), "Fairfax", "VA");
        assert!(!form.apply_zip_lookup(&first, Some(stale)));
        assert_eq!(form.draft().city, "");
    }

    #[test]
    fn test_malformed_blur_invalidates_in_flight_lookup() {
        let mut form = new_form();
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        let pending = form.begin_zip_lookup().unwrap().unwrap();

        form.edit_field(FieldName::ZipCode, "abc").unwrap();
        assert!(form.begin_zip_lookup().unwrap().is_none());

        let late = ZipCodeEntry::new(pending.zip(), "Fairfax", "VA");
        assert!(!form.apply_zip_lookup(&pending, Some(late)));
        assert_eq!(form.draft().city, "");
    }

    #[test]
    fn test_toggle_is_involutive() {
        let mut form = new_form();
        form.toggle_category(CampusLiked::Sports).unwrap();
        let before = form.draft().campus_liked.clone();

        assert!(form.toggle_category(CampusLiked::Atmosphere).unwrap());
        assert!(!form.toggle_category(CampusLiked::Atmosphere).unwrap());
        assert_eq!(form.draft().campus_liked, before);
        assert!(form.is_category_selected(CampusLiked::Sports));
    }

    #[test]
    fn test_empty_submit_reports_required_and_stays_ready() {
        let mut form = new_form();
        let err = form.begin_submit().unwrap_err();

        let FormError::Invalid(validation) = err else {
            panic!("expected validation failure");
        };
        for field in FieldName::ALL {
            let validity = validation.field(field).unwrap();
            assert!(validity.touched);
            match field {
                FieldName::PhoneNumber | FieldName::Comments => assert!(validity.is_valid()),
                _ => assert_eq!(validity.first_error, Some(ErrorKind::Required), "{field}"),
            }
        }
        assert_eq!(form.state(), FormState::Ready);
        assert_eq!(form.error_message(), Some(MSG_INVALID_FORM));
        assert_eq!(form.visible_error(FieldName::City), Some(ErrorKind::Required));
    }

    #[test]
    fn test_single_category_fails_min_selection() {
        let mut form = new_form();
        fill_valid(&mut form);
        form.toggle_category(CampusLiked::Campus).unwrap();
        assert_eq!(form.draft().campus_liked.len(), 1);

        let err = form.begin_submit().unwrap_err();
        let FormError::Invalid(validation) = err else {
            panic!("expected validation failure");
        };
        assert_eq!(validation.invalid_fields(), vec![FieldName::CampusLiked]);
        assert_eq!(validation.first_error(FieldName::CampusLiked), Some(ErrorKind::MinSelection));

        form.toggle_category(CampusLiked::Location).unwrap();
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_failed_lookup_blocks_submit_through_required_city() {
        let mut form = new_form();
        fill_valid(&mut form);
        form.edit_field(FieldName::ZipCode, "12345").unwrap();
        form.blur_zip().unwrap();

        let FormError::Invalid(validation) = form.begin_submit().unwrap_err() else {
            panic!("expected validation failure");
        };
        assert_eq!(validation.invalid_fields(), vec![FieldName::City, FieldName::State]);

        form.edit_field(FieldName::City, "Schenectady").unwrap();
        form.edit_field(FieldName::State, "NY").unwrap();
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_submit_locks_form_and_rejects_reentry() {
        let mut form = new_form();
        fill_valid(&mut form);
        let pending = form.begin_submit().unwrap();
        assert_eq!(pending.id, None);
        assert_eq!(form.state(), FormState::Submitting);

        assert_eq!(form.begin_submit(), Err(FormError::SubmitInFlight));
        assert_eq!(
            form.edit_field(FieldName::City, "X"),
            Err(FormError::Locked(FormState::Submitting))
        );
        assert!(form.toggle_category(CampusLiked::Sports).is_err());
    }

    #[test]
    fn test_create_success_clears_draft() {
        let mut form = new_form();
        fill_valid(&mut form);
        form.begin_submit().unwrap();
        form.complete_submit::<String>(Ok(stored_record(1))).unwrap();

        assert_eq!(form.state(), FormState::Succeeded);
        assert!(form.draft().is_blank());
        assert_eq!(form.success_message(), Some(MSG_CREATED));
        assert_eq!(form.record().map(|r| r.id), Some(SurveyId::new(1)));
        assert_eq!(form.begin_submit(), Err(FormError::Locked(FormState::Succeeded)));
    }

    #[test]
    fn test_failure_preserves_draft_and_allows_retry() {
        let mut form = new_form();
        fill_valid(&mut form);
        let draft = form.draft().clone();
        form.begin_submit().unwrap();
        form.complete_submit::<&str>(Err("connection refused")).unwrap();

        assert_eq!(form.state(), FormState::Failed);
        assert_eq!(form.draft(), &draft);
        assert_eq!(form.error_message(), Some(MSG_CREATE_FAILED));
        assert!(!form.error_message().unwrap().contains("refused"));

        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn test_complete_without_submit_is_rejected() {
        let mut form = new_form();
        assert!(matches!(
            form.complete_submit::<String>(Ok(stored_record(1))),
            Err(FormError::InvalidTransition { action: "complete_submit", .. })
        ));
    }

    #[test]
    fn test_hydrate_then_submit_targets_update_with_same_fields() {
        let record = stored_record(5);
        let mut form = new_form();
        form.begin_loading(SurveyId::new(5)).unwrap();
        assert_eq!(form.state(), FormState::Loading);
        assert!(form.edit_field(FieldName::City, "x").is_err());

        form.hydrate(record.clone()).unwrap();
        assert_eq!(form.state(), FormState::Ready);
        assert!(!form.is_touched(FieldName::FirstName));

        let pending = form.begin_submit().unwrap();
        assert_eq!(pending.id, Some(SurveyId::new(5)));
        assert_eq!(pending.payload, record.fields);
    }

    #[test]
    fn test_update_success_keeps_echoed_record() {
        let record = stored_record(5);
        let mut form = new_form();
        form.begin_loading(SurveyId::new(5)).unwrap();
        form.hydrate(record.clone()).unwrap();
        form.edit_field(FieldName::Comments, "Loved it").unwrap();
        form.begin_submit().unwrap();

        let mut echoed = record.clone();
        echoed.fields.comments = Some("Loved it".into());
        echoed.updated_at = record.updated_at + chrono::Duration::hours(1);
        form.complete_submit::<String>(Ok(echoed.clone())).unwrap();

        assert_eq!(form.state(), FormState::Succeeded);
        assert_eq!(form.draft().comments.as_deref(), Some("Loved it"));
        assert_eq!(form.record(), Some(&echoed));
        assert_eq!(form.success_message(), Some(MSG_UPDATED));
    }

    #[test]
    fn test_hydrate_rejects_wrong_record() {
        let mut form = new_form();
        assert!(form.hydrate(stored_record(1)).is_err());

        form.begin_loading(SurveyId::new(2)).unwrap();
        assert!(matches!(
            form.hydrate(stored_record(1)),
            Err(FormError::RecordMismatch { .. })
        ));
    }

    #[test]
    fn test_fail_loading_returns_to_empty_create_form() {
        let mut form = new_form();
        form.begin_loading(SurveyId::new(9)).unwrap();
        form.fail_loading("survey not found: 9").unwrap();
        assert_eq!(form.state(), FormState::Empty);
        assert!(!form.is_edit_mode());
        assert_eq!(form.error_message(), Some(MSG_LOAD_FAILED));
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut form = new_form();
        fill_valid(&mut form);
        form.begin_submit().unwrap();
        form.reset();

        assert_eq!(form.state(), FormState::Empty);
        assert!(form.draft().is_blank());
        assert!(!form.submitted());
        assert!(!form.is_touched(FieldName::FirstName));
        assert_eq!(form.error_message(), None);
        assert!(matches!(form.take_events().last(), Some(DomainEvent::Form(FormEvent::Reset))));
    }

    #[test]
    fn test_unready_index_fails_closed() {
        let mut form = IntakeForm::new(Arc::new(ZipIndex::empty()));
        assert!(!form.lookup_ready());
        form.edit_field(FieldName::ZipCode, "22030").unwrap();
        form.edit_field(FieldName::City, "Fairfax").unwrap();
        assert_eq!(form.blur_zip().unwrap(), None);
        assert_eq!(form.draft().city, "");
        assert_eq!(form.error_for(FieldName::ZipCode), None);
    }
}
