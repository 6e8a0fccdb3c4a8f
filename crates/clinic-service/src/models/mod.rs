//! Pet clinic domain models.
//!
//! A [`Holder`] owns an ordered list of [`Pet`]s, and each pet owns an ordered
//! list of [`Visit`]s. Back-references (`holder_id`, `pet_id`) are plain ids,
//! never owning pointers. Identity is assigned by the repository on save; a
//! `None` id marks a record that has not been persisted yet.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors raised by model operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Unknown pet {pet_id} for holder")]
    UnknownPet { pet_id: i32 },
}

/// A named pet classification, shared by reference across pets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PetType {
    pub id: i32,
    pub name: String,
}

/// A veterinary visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: Option<i32>,

    /// Pet this visit is attached to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<i32>,

    /// Visit date. `None` only while a submitted form is being validated.
    pub date: Option<NaiveDate>,

    pub description: String,
}

impl Visit {
    /// A blank visit dated today.
    pub fn new() -> Self {
        Self {
            id: None,
            pet_id: None,
            date: Some(Utc::now().date_naive()),
            description: String::new(),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl Default for Visit {
    fn default() -> Self {
        Self::new()
    }
}

/// A pet belonging to one holder.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Option<i32>,

    /// Holder this pet belongs to (back-reference only).
    #[serde(skip_serializing)]
    pub holder_id: Option<i32>,

    pub name: String,

    pub birth_date: Option<NaiveDate>,

    #[serde(rename = "type")]
    pub pet_type: Option<PetType>,

    pub visits: Vec<Visit>,
}

impl Pet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Append a visit and point it back at this pet.
    pub fn add_visit(&mut self, mut visit: Visit) {
        visit.pet_id = self.id;
        self.visits.push(visit);
    }
}

/// A clinic client.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holder {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
    pub pets: Vec<Pet>,
}

impl Holder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Add a pet to this holder.
    ///
    /// Only new pets are appended; a pet that already has an id is either
    /// present already or belongs elsewhere, so the list stays unique by
    /// identity.
    pub fn add_pet(&mut self, mut pet: Pet) {
        if pet.is_new() {
            pet.holder_id = self.id;
            self.pets.push(pet);
        }
    }

    /// Find a saved pet by id.
    pub fn pet(&self, pet_id: i32) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == Some(pet_id))
    }

    pub fn pet_mut(&mut self, pet_id: i32) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == Some(pet_id))
    }

    /// Find a pet by name, ignoring case.
    ///
    /// With `ignore_new`, pets that have not been saved yet are skipped.
    pub fn pet_by_name(&self, name: &str, ignore_new: bool) -> Option<&Pet> {
        self.pets
            .iter()
            .filter(|p| !ignore_new || !p.is_new())
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Add a visit to one of this holder's saved pets.
    pub fn add_visit(&mut self, pet_id: i32, visit: Visit) -> Result<(), ModelError> {
        let pet = self
            .pet_mut(pet_id)
            .ok_or(ModelError::UnknownPet { pet_id })?;
        pet.add_visit(visit);
        Ok(())
    }
}

/// Page request: zero-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub page: u32,
    pub size: u32,
}

impl Pageable {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page number.
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Readiness check response.
///
/// Returned by the `/ready` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready".
    pub status: &'static str,

    /// Repository reachability ("healthy" or "unhealthy").
    pub repository: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
