//! Pet handlers, scoped to one holder.
//!
//! - `GET  /holders/{holderId}/pets/new`
//! - `POST /holders/{holderId}/pets/new`
//! - `GET  /holders/{holderId}/pets/{petId}/edit`
//! - `POST /holders/{holderId}/pets/{petId}/edit`

use super::find_holder;
use crate::errors::ClinicError;
use crate::forms::pet::{bind_pet, check_birth_date, check_duplicate_name, validate_pet};
use crate::forms::{BindingResult, FormData};
use crate::models::{Holder, Pet};
use crate::observability::metrics::{record_created, record_form_rejection};
use crate::routes::AppState;
use crate::views::{ModelAndView, View, PET_FORM};
use axum::extract::{Path, State};
use axum::Form;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

async fn pet_form(
    state: &AppState,
    holder: &Holder,
    pet: &Pet,
    result: BindingResult,
) -> Result<View, ClinicError> {
    let types = state.holders.find_pet_types().await?;
    Ok(ModelAndView::new(PET_FORM)
        .with("holder", holder)?
        .with("pet", pet)?
        .with("types", &types)?
        .with_errors("pet", result)
        .into())
}

/// Handler for GET /holders/{holderId}/pets/new
#[instrument(skip(state))]
pub async fn init_pet_creation_form(
    State(state): State<Arc<AppState>>,
    Path(holder_id): Path<i32>,
) -> Result<View, ClinicError> {
    let holder = find_holder(&state, holder_id).await?;
    let pet = Pet {
        holder_id: holder.id,
        ..Pet::new()
    };
    pet_form(&state, &holder, &pet, BindingResult::new()).await
}

/// Handler for POST /holders/{holderId}/pets/new
#[instrument(skip(state, params))]
pub async fn process_pet_creation_form(
    State(state): State<Arc<AppState>>,
    Path(holder_id): Path<i32>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<View, ClinicError> {
    let mut holder = find_holder(&state, holder_id).await?;
    let types = state.holders.find_pet_types().await?;

    let mut pet = Pet::new();
    let mut result = BindingResult::new();
    bind_pet(&mut pet, &FormData::new(params), &types, &mut result);
    validate_pet(&pet, &mut result);
    check_duplicate_name(&holder, &pet, &mut result);
    check_birth_date(&pet, Utc::now().date_naive(), &mut result);

    if result.has_errors() {
        record_form_rejection("pet");
        pet.holder_id = holder.id;
        return pet_form(&state, &holder, &pet, result).await;
    }

    holder.add_pet(pet);
    state.holders.save(holder).await?;

    record_created("pet");
    info!(target: "clinic.handlers.pets", holder_id, "Pet created");

    Ok(View::redirect(format!("/holders/{}", holder_id)))
}

/// Handler for GET /holders/{holderId}/pets/{petId}/edit
#[instrument(skip(state))]
pub async fn init_pet_update_form(
    State(state): State<Arc<AppState>>,
    Path((holder_id, pet_id)): Path<(i32, i32)>,
) -> Result<View, ClinicError> {
    let holder = find_holder(&state, holder_id).await?;
    let pet = holder
        .pet(pet_id)
        .ok_or_else(|| ClinicError::NotFound(format!("Pet {} not found", pet_id)))?;
    pet_form(&state, &holder, pet, BindingResult::new()).await
}

/// Handler for POST /holders/{holderId}/pets/{petId}/edit
///
/// Binds onto the stored pet, so its visits and any omitted fields survive.
#[instrument(skip(state, params))]
pub async fn process_pet_update_form(
    State(state): State<Arc<AppState>>,
    Path((holder_id, pet_id)): Path<(i32, i32)>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<View, ClinicError> {
    let mut holder = find_holder(&state, holder_id).await?;
    let types = state.holders.find_pet_types().await?;

    let mut pet = holder
        .pet(pet_id)
        .cloned()
        .ok_or_else(|| ClinicError::NotFound(format!("Pet {} not found", pet_id)))?;

    let mut result = BindingResult::new();
    bind_pet(&mut pet, &FormData::new(params), &types, &mut result);
    validate_pet(&pet, &mut result);
    check_duplicate_name(&holder, &pet, &mut result);
    check_birth_date(&pet, Utc::now().date_naive(), &mut result);

    if result.has_errors() {
        record_form_rejection("pet");
        return pet_form(&state, &holder, &pet, result).await;
    }

    if let Some(stored) = holder.pet_mut(pet_id) {
        stored.name = pet.name;
        stored.birth_date = pet.birth_date;
        if pet.pet_type.is_some() {
            stored.pet_type = pet.pet_type;
        }
    }
    state.holders.save(holder).await?;

    info!(target: "clinic.handlers.pets", holder_id, pet_id, "Pet updated");

    Ok(View::redirect(format!("/holders/{}", holder_id)))
}
