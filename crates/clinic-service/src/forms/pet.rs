//! Pet form binding and validation.
//!
//! The `type` field carries a pet-type name and is resolved against the types
//! known to the repository.

use super::{codes, require_max_length, BindingResult, FormData};
use crate::models::{Holder, Pet, PetType};
use chrono::NaiveDate;

/// Copy submitted pet fields onto `pet`.
pub fn bind_pet(pet: &mut Pet, form: &FormData, types: &[PetType], result: &mut BindingResult) {
    form.bind_string("name", &mut pet.name);
    form.bind_date("birthDate", &mut pet.birth_date, result);

    if let Some(type_name) = form.get("type") {
        let type_name = type_name.trim();
        if type_name.is_empty() {
            pet.pet_type = None;
        } else {
            match types.iter().find(|t| t.name == type_name) {
                Some(pet_type) => pet.pet_type = Some(pet_type.clone()),
                None => result.reject_value("type", codes::TYPE_MISMATCH, "type not found"),
            }
        }
    }
}

/// Column size of `pets.name`.
pub const NAME_MAX_LENGTH: usize = 30;

/// Field rules for a bound pet.
pub fn validate_pet(pet: &Pet, result: &mut BindingResult) {
    if pet.name.trim().is_empty() {
        result.reject_value("name", codes::REQUIRED, "is required");
    }
    require_max_length("name", &pet.name, NAME_MAX_LENGTH, result);

    if pet.is_new() && pet.pet_type.is_none() && !result.has_field_errors("type") {
        result.reject_value("type", codes::REQUIRED, "is required");
    }

    if pet.birth_date.is_none() && !result.has_field_errors("birthDate") {
        result.reject_value("birthDate", codes::REQUIRED, "is required");
    }
}

/// Reject a name already used by another saved pet of `holder`.
pub fn check_duplicate_name(holder: &Holder, pet: &Pet, result: &mut BindingResult) {
    if pet.name.trim().is_empty() {
        return;
    }
    if let Some(existing) = holder.pet_by_name(&pet.name, true) {
        if existing.id != pet.id {
            result.reject_value("name", codes::DUPLICATE, "already exists");
        }
    }
}

/// Reject a birth date after `today`.
pub fn check_birth_date(pet: &Pet, today: NaiveDate, result: &mut BindingResult) {
    if let Some(birth_date) = pet.birth_date {
        if birth_date > today {
            result.reject_value(
                "birthDate",
                codes::TYPE_MISMATCH,
                "birth date cannot be in the future",
            );
        }
    }
}
