//! View results returned by clinic handlers.
//!
//! A handler either renders a named view with its model, or redirects after a
//! successful submission. Rendered views are sent as JSON:
//!
//! ```text
//! { "view": "pets/createOrUpdateVisitForm",
//!   "model": { "holder": {...}, "pet": {...}, "visit": {...} },
//!   "errors": { "visit": [ { "field": "description", "code": "NotBlank", ... } ] } }
//! ```

use crate::errors::ClinicError;
use crate::forms::{BindingResult, FieldError};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const HOLDER_FORM: &str = "holders/createOrUpdateHolderForm";
pub const FIND_HOLDERS: &str = "holders/findHolders";
pub const HOLDERS_LIST: &str = "holders/holdersList";
pub const HOLDER_DETAILS: &str = "holders/holderDetails";
pub const PET_FORM: &str = "pets/createOrUpdatePetForm";
pub const VISIT_FORM: &str = "pets/createOrUpdateVisitForm";

/// A view name with its model and per-attribute field errors.
#[derive(Debug, Clone, Serialize)]
pub struct ModelAndView {
    pub view: String,
    pub model: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<FieldError>>,
}

impl ModelAndView {
    pub fn new(view: &str) -> Self {
        Self {
            view: view.to_string(),
            model: Map::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Put a named attribute into the model.
    pub fn with<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self, ClinicError> {
        let value = serde_json::to_value(value).map_err(|e| {
            tracing::error!(target: "clinic.views", error = %e, attribute = %name, "Failed to serialize model attribute");
            ClinicError::Internal
        })?;
        self.model.insert(name.to_string(), value);
        Ok(self)
    }

    /// Attach the field errors collected for a model attribute.
    pub fn with_errors(mut self, name: &str, result: BindingResult) -> Self {
        if result.has_errors() {
            self.errors
                .entry(name.to_string())
                .or_default()
                .extend(result.into_errors());
        }
        self
    }
}

/// Handler outcome: render a view or redirect.
#[derive(Debug, Clone)]
pub enum View {
    Render(ModelAndView),
    Redirect(String),
}

impl View {
    pub fn redirect(location: impl Into<String>) -> Self {
        View::Redirect(location.into())
    }
}

impl From<ModelAndView> for View {
    fn from(mav: ModelAndView) -> Self {
        View::Render(mav)
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        match self {
            View::Render(mav) => (StatusCode::OK, Json(mav)).into_response(),
            View::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
        }
    }
}
