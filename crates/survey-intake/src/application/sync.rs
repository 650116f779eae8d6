//! Survey record sync service
//!
//! Moves validated drafts to the record store and loads stored records back
//! into forms for editing.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::aggregates::{FormError, IntakeForm, PendingSubmission};
use crate::domain::events::SyncEvent;
use crate::domain::value_objects::{SurveyId, SurveyPayload, SurveyRecord};
use crate::ports::outbound::{StoreError, SurveyStore};

/// Result of pushing a form through the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(SurveyRecord),
    Updated(SurveyRecord),
    /// The store refused or was unreachable; the form keeps its draft.
    Failed(SyncError),
}

impl SubmitOutcome {
    pub fn record(&self) -> Option<&SurveyRecord> {
        match self {
            Self::Created(record) | Self::Updated(record) => Some(record),
            Self::Failed(_) => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Survey record sync application service
pub struct SurveyRecordSync {
    store: Arc<dyn SurveyStore>,
    events: Mutex<Vec<SyncEvent>>,
}

impl SurveyRecordSync {
    pub fn new(store: Arc<dyn SurveyStore>) -> Self {
        Self {
            store,
            events: Mutex::new(vec![]),
        }
    }

    pub async fn submit_create(&self, payload: &SurveyPayload) -> Result<SurveyRecord, SyncError> {
        match self.store.create(payload).await {
            Ok(record) => {
                info!(survey_id = %record.id, "survey created");
                self.raise_event(SyncEvent::Created { id: record.id });
                Ok(record)
            }
            Err(err) => {
                error!(error = %err, "survey create failed");
                Err(err.into())
            }
        }
    }

    pub async fn submit_update(
        &self,
        id: SurveyId,
        payload: &SurveyPayload,
    ) -> Result<SurveyRecord, SyncError> {
        match self.store.update(id, payload).await {
            Ok(record) => {
                info!(survey_id = %record.id, "survey updated");
                self.raise_event(SyncEvent::Updated { id: record.id });
                Ok(record)
            }
            Err(err) => {
                error!(survey_id = %id, error = %err, "survey update failed");
                Err(err.into())
            }
        }
    }

    pub async fn fetch_by_id(&self, id: SurveyId) -> Result<SurveyRecord, SyncError> {
        self.store.get(id).await.map_err(|err| {
            warn!(survey_id = %id, error = %err, "survey fetch failed");
            err.into()
        })
    }

    /// Delete a survey; listings held elsewhere are stale afterwards.
    pub async fn delete_by_id(&self, id: SurveyId) -> Result<(), SyncError> {
        match self.store.delete(id).await {
            Ok(()) => {
                info!(survey_id = %id, "survey deleted");
                self.raise_event(SyncEvent::ListingStale { deleted: id });
                Ok(())
            }
            Err(err) => {
                error!(survey_id = %id, error = %err, "survey delete failed");
                Err(err.into())
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<SurveyRecord>, SyncError> {
        Ok(self.store.list().await?)
    }

    pub async fn count(&self) -> Result<u64, SyncError> {
        Ok(self.store.count().await?)
    }

    /// Route a submission: an id means update, no id means create.
    pub async fn dispatch(&self, pending: PendingSubmission) -> Result<SurveyRecord, SyncError> {
        match pending.id {
            Some(id) => self.submit_update(id, &pending.payload).await,
            None => self.submit_create(&pending.payload).await,
        }
    }

    /// Validate, send and settle one form submission.
    ///
    /// Validation failures come back as `FormError::Invalid` without touching
    /// the store; store failures come back as `SubmitOutcome::Failed`.
    pub async fn submit(&self, form: &mut IntakeForm) -> Result<SubmitOutcome, FormError> {
        let pending = form.begin_submit()?;
        let creating = pending.id.is_none();

        let result = self.dispatch(pending).await;
        let outcome = match &result {
            Ok(record) if creating => SubmitOutcome::Created(record.clone()),
            Ok(record) => SubmitOutcome::Updated(record.clone()),
            Err(err) => SubmitOutcome::Failed(err.clone()),
        };

        form.complete_submit(result)?;
        Ok(outcome)
    }

    /// Put `form` in edit mode for `id` and hydrate it from the store.
    ///
    /// On fetch failure the form drops back to an empty create form and the
    /// fetch error is returned.
    pub async fn load_for_edit(&self, form: &mut IntakeForm, id: SurveyId) -> crate::Result<()> {
        form.begin_loading(id)?;

        match self.fetch_by_id(id).await {
            Ok(record) => Ok(form.hydrate(record)?),
            Err(err) => {
                form.fail_loading(&err)?;
                Err(err.into())
            }
        }
    }

    /// Get and clear accumulated sync events
    pub fn take_events(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    fn raise_event(&self, event: SyncEvent) {
        self.events.lock().push(event);
    }
}

/// Sync error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("survey {0} not found")]
    NotFound(SurveyId),

    #[error("survey rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("survey service unavailable: {0}")]
    Unavailable(String),
}

impl SyncError {
    /// Message safe to show to the person filling in the form
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Survey not found. It may have been deleted.",
            Self::Rejected { .. } => "The survey was not accepted. Please check your answers and try again.",
            Self::Unavailable(_) => "The survey service is unavailable. Please try again.",
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Rejected { status, message } => Self::Rejected { status, message },
            other => Self::Unavailable(other.to_string()),
        }
    }
}
