//! Domain Events
//!
//! Raised by the intake form and the sync service so the presentation layer
//! can react (navigate, refresh a listing, flash a message).

use crate::domain::value_objects::{SurveyId, ZipCode};

/// All events in the survey intake context
#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Form(FormEvent),
    Sync(SyncEvent),
}

/// Intake form events
#[derive(Clone, Debug, PartialEq)]
pub enum FormEvent {
    ZipResolved {
        zip: ZipCode,
        city: String,
        state: String,
    },

    ZipCleared {
        input: String,
    },

    SubmitRejected {
        invalid_fields: usize,
    },

    Submitted {
        id: Option<SurveyId>,
    },

    Synced {
        id: SurveyId,
        created: bool,
    },

    SyncFailed {
        id: Option<SurveyId>,
    },

    Reset,
}

/// Record store events
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    Created { id: SurveyId },
    Updated { id: SurveyId },
    /// A record was deleted; cached listings are stale.
    ListingStale { deleted: SurveyId },
}
