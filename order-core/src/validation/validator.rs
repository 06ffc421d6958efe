use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use super::rules::{is_valid_mobile, is_valid_order_date};
use crate::form::{FieldName, FieldStore};

/// Why an order cannot be submitted. `Display` is the banner text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid 10-digit Indian mobile number (starts with 6,7,8,9).")]
    InvalidMobile,

    #[error("Order date cannot be in the future.")]
    FutureOrderDate,

    #[error("Please fill in all required fields.")]
    MissingRequired(Vec<FieldName>),
}

/// Highlight state of a single input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldState {
    #[default]
    Normal,
    Invalid,
}

/// Result of one validation pass: which inputs to highlight and whether the
/// order may be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub field_states: BTreeMap<FieldName, FieldState>,
    pub outcome: Result<(), ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.outcome.as_ref().err()
    }

    pub fn state(
        &self,
        field: &FieldName,
    ) -> FieldState {
        self.field_states.get(field).copied().unwrap_or_default()
    }
}

/// Submit gate for the order form.
///
/// Checks run in a fixed order: required fields, then the mobile format,
/// then the order date. A failing format check ends the pass immediately so
/// only one message is ever surfaced; the generic "required" message is only
/// used when both format checks pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(
        &self,
        fields: &impl FieldStore,
        today: NaiveDate,
    ) -> ValidationReport {
        let mut field_states = BTreeMap::new();
        let mut missing = Vec::new();

        for field in FieldName::REQUIRED.iter() {
            let state = if fields.get(field).trim().is_empty() {
                missing.push(field.clone());
                FieldState::Invalid
            } else {
                FieldState::Normal
            };
            field_states.insert(field.clone(), state);
        }

        let outcome = self.check_formats(fields, today, &mut field_states, missing);
        if let Err(error) = &outcome {
            debug!(%error, "order form failed validation");
        }

        ValidationReport {
            field_states,
            outcome,
        }
    }

    fn check_formats(
        &self,
        fields: &impl FieldStore,
        today: NaiveDate,
        field_states: &mut BTreeMap<FieldName, FieldState>,
        missing: Vec<FieldName>,
    ) -> Result<(), ValidationError> {
        if !is_valid_mobile(&fields.get(&FieldName::Mobile)) {
            field_states.insert(FieldName::Mobile, FieldState::Invalid);
            return Err(ValidationError::InvalidMobile);
        }
        field_states.insert(FieldName::Mobile, FieldState::Normal);

        if !is_valid_order_date(&fields.get(&FieldName::OrderDate), today) {
            field_states.insert(FieldName::OrderDate, FieldState::Invalid);
            return Err(ValidationError::FutureOrderDate);
        }
        field_states.insert(FieldName::OrderDate, FieldState::Normal);

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequired(missing))
        }
    }
}
