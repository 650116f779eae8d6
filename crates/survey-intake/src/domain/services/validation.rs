//! Derived validation state of a whole draft

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::validators::{check_field, ErrorKind};
use crate::domain::value_objects::{FieldName, SurveyDraft};

/// Validity of a single field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FieldValidity {
    pub touched: bool,
    pub errors: BTreeSet<ErrorKind>,
    /// First failing rule in table order; this is the one shown to the user.
    pub first_error: Option<ErrorKind>,
}

impl FieldValidity {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Field name → validity, recomputed on demand and never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationState {
    fields: BTreeMap<FieldName, FieldValidity>,
}

impl ValidationState {
    /// Evaluate every rule for every field, regardless of touched state.
    pub fn evaluate(draft: &SurveyDraft, touched: &BTreeSet<FieldName>) -> Self {
        let fields = FieldName::ALL
            .into_iter()
            .map(|field| {
                let failing = check_field(draft, field);
                let validity = FieldValidity {
                    touched: touched.contains(&field),
                    first_error: failing.first().copied(),
                    errors: failing.into_iter().collect(),
                };
                (field, validity)
            })
            .collect();
        Self { fields }
    }

    pub fn is_valid(&self) -> bool {
        self.fields.values().all(FieldValidity::is_valid)
    }

    pub fn field(&self, field: FieldName) -> Option<&FieldValidity> {
        self.fields.get(&field)
    }

    pub fn first_error(&self, field: FieldName) -> Option<ErrorKind> {
        self.fields.get(&field).and_then(|v| v.first_error)
    }

    /// Fields with at least one error, in form order
    pub fn invalid_fields(&self) -> Vec<FieldName> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_valid())
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &FieldValidity)> {
        self.fields.iter().map(|(field, validity)| (*field, validity))
    }
}
