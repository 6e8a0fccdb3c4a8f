//! Form binding and validation.
//!
//! Submitted form fields are copied onto a target entity ("binding"). Only
//! fields present in the submission are applied, so an edit form that omits a
//! field leaves the stored value untouched. Conversion failures and
//! validation rule violations are collected as [`FieldError`]s in a
//! [`BindingResult`]; the handler decides whether to re-render the form.
//!
//! Fields in [`DISALLOWED_FIELDS`] are stripped before binding. Identity is
//! assigned by the repository and can never be supplied by a client.

pub mod holder;
pub mod pet;
pub mod visit;

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Fields that are never bound from a submission.
pub const DISALLOWED_FIELDS: &[&str] = &["id"];

/// Date format accepted by date fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error codes attached to rejected fields.
pub mod codes {
    pub const NOT_BLANK: &str = "NotBlank";
    pub const DIGITS: &str = "Digits";
    pub const REQUIRED: &str = "required";
    pub const TYPE_MISMATCH: &str = "typeMismatch";
    pub const DUPLICATE: &str = "duplicate";
    pub const NOT_FOUND: &str = "notFound";
    pub const SIZE: &str = "Size";
}

/// A rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Field errors collected while binding and validating one model attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingResult {
    errors: Vec<FieldError>,
}

impl BindingResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `field`.
    pub fn reject_value(&mut self, field: &str, code: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// First error recorded for `field`.
    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// Submitted form fields with disallowed fields removed.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn new(mut fields: HashMap<String, String>) -> Self {
        for name in DISALLOWED_FIELDS {
            if fields.remove(*name).is_some() {
                debug!(target: "clinic.forms", field = %name, "Dropped disallowed form field");
            }
        }
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Copy a text field onto `target` when present.
    pub fn bind_string(&self, field: &str, target: &mut String) {
        if let Some(value) = self.get(field) {
            *target = value.to_string();
        }
    }

    /// Parse a `yyyy-MM-dd` date field onto `target` when present.
    ///
    /// An empty value clears the target. A value that does not parse leaves
    /// the target unchanged and records a `typeMismatch` error.
    pub fn bind_date(
        &self,
        field: &str,
        target: &mut Option<NaiveDate>,
        result: &mut BindingResult,
    ) {
        let Some(value) = self.get(field) else {
            return;
        };
        let value = value.trim();
        if value.is_empty() {
            *target = None;
            return;
        }
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(date) => *target = Some(date),
            Err(_) => result.reject_value(
                field,
                codes::TYPE_MISMATCH,
                "invalid date, expected yyyy-MM-dd",
            ),
        }
    }
}

/// Reject `field` when `value` is empty or whitespace.
pub(crate) fn require_not_blank(field: &str, value: &str, result: &mut BindingResult) {
    if value.trim().is_empty() {
        result.reject_value(field, codes::NOT_BLANK, "must not be blank");
    }
}

/// Reject `field` when `value` is longer than `max` characters.
pub(crate) fn require_max_length(field: &str, value: &str, max: usize, result: &mut BindingResult) {
    if value.chars().count() > max {
        result.reject_value(field, codes::SIZE, &format!("size must be between 0 and {}", max));
    }
}
