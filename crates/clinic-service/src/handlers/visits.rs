//! Visit handlers.
//!
//! - `GET  /holders/{holderId}/pets/{petId}/visits/new`
//! - `POST /holders/{holderId}/pets/{petId}/visits/new`
//!
//! Both routes first resolve the holder and pet through [`VisitForm`], which
//! also prepares the pending visit.

use super::find_holder;
use crate::errors::ClinicError;
use crate::forms::visit::{bind_visit, validate_visit};
use crate::forms::{BindingResult, FormData};
use crate::models::{Holder, Pet, Visit};
use crate::observability::metrics::{record_created, record_form_rejection};
use crate::routes::AppState;
use crate::views::{ModelAndView, View, VISIT_FORM};
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::Form;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Debug, Deserialize)]
struct VisitPath {
    holder_id: i32,
    pet_id: i32,
}

/// Holder, pet and pending visit for a visit request.
///
/// The pending visit is dated today and references the pet, but is not in
/// the pet's visit list until it is saved.
#[derive(Debug, Clone)]
pub struct VisitForm {
    pub holder: Holder,
    pub pet_id: i32,
    pub visit: Visit,
}

impl VisitForm {
    pub fn pet(&self) -> Option<&Pet> {
        self.holder.pet(self.pet_id)
    }

    fn render(&self, result: BindingResult) -> Result<View, ClinicError> {
        let mut mav = ModelAndView::new(VISIT_FORM).with("holder", &self.holder)?;
        if let Some(pet) = self.pet() {
            mav = mav.with("pet", pet)?;
        }
        Ok(mav
            .with("visit", &self.visit)?
            .with_errors("visit", result)
            .into())
    }
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for VisitForm {
    type Rejection = ClinicError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let Path(path) = Path::<VisitPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| ClinicError::BadRequest(e.body_text()))?;

        let holder = find_holder(state, path.holder_id).await?;
        if holder.pet(path.pet_id).is_none() {
            return Err(ClinicError::NotFound(format!("Pet {} not found", path.pet_id)));
        }

        let visit = Visit {
            pet_id: Some(path.pet_id),
            ..Visit::new()
        };

        Ok(Self {
            holder,
            pet_id: path.pet_id,
            visit,
        })
    }
}

/// Handler for GET /holders/{holderId}/pets/{petId}/visits/new
pub async fn init_new_visit_form(form: VisitForm) -> Result<View, ClinicError> {
    form.render(BindingResult::new())
}

/// Handler for POST /holders/{holderId}/pets/{petId}/visits/new
///
/// Nothing is saved when the submission has field errors.
#[instrument(skip_all, fields(holder_id = ?form.holder.id, pet_id = form.pet_id))]
pub async fn process_new_visit_form(
    State(state): State<Arc<AppState>>,
    mut form: VisitForm,
    Form(params): Form<HashMap<String, String>>,
) -> Result<View, ClinicError> {
    let mut result = BindingResult::new();
    bind_visit(&mut form.visit, &FormData::new(params), &mut result);
    validate_visit(&form.visit, &mut result);

    if result.has_errors() {
        record_form_rejection("visit");
        return form.render(result);
    }

    let VisitForm {
        mut holder,
        pet_id,
        visit,
    } = form;
    holder.add_visit(pet_id, visit)?;
    let holder = state.holders.save(holder).await?;
    let holder_id = holder.id.ok_or(ClinicError::Internal)?;

    record_created("visit");
    info!(target: "clinic.handlers.visits", holder_id, pet_id, "Visit created");

    Ok(View::redirect(format!("/holders/{}", holder_id)))
}
