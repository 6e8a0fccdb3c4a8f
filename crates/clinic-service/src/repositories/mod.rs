//! Repository layer for the clinic service.
//!
//! Handlers talk to storage only through [`HolderRepository`]. A holder is the
//! aggregate root: pets and visits are loaded with their holder and persisted
//! by saving the holder.
//!
//! Implementations:
//! - [`PgHolderRepository`] - PostgreSQL via sqlx
//! - [`InMemoryHolderRepository`] - process-local store for development and tests

pub mod memory;
pub mod postgres;
pub mod sample;

pub use memory::InMemoryHolderRepository;
pub use postgres::PgHolderRepository;

use crate::errors::ClinicError;
use crate::models::{Holder, Page, Pageable, PetType};

/// Storage for holders and their pets and visits.
#[async_trait::async_trait]
pub trait HolderRepository: Send + Sync {
    /// All pet types, ordered by name.
    async fn find_pet_types(&self) -> Result<Vec<PetType>, ClinicError>;

    /// Holders whose last name starts with `last_name`, ordered by id.
    async fn find_by_last_name(
        &self,
        last_name: &str,
        pageable: Pageable,
    ) -> Result<Page<Holder>, ClinicError>;

    /// Holder with pets, pet types and visits loaded.
    async fn find_by_id(&self, id: i32) -> Result<Option<Holder>, ClinicError>;

    /// Insert or update a holder, its pets and any new visits.
    ///
    /// Returns the holder with every id assigned.
    async fn save(&self, holder: Holder) -> Result<Holder, ClinicError>;

    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), ClinicError>;
}
