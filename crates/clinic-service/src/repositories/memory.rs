//! In-memory holder repository.
//!
//! Keeps holders in a `BTreeMap` behind a `tokio::sync::RwLock`. Ids are
//! assigned from per-table counters, mirroring database sequences. Saving a
//! stored holder merges into it the way the Postgres repository does. Used when
//! no `DATABASE_URL` is configured and by tests, which can inspect how many
//! times `save` was called.

use super::{sample, HolderRepository};
use crate::errors::ClinicError;
use crate::models::{Holder, Page, Pageable, PetType};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

#[derive(Debug, Default)]
struct Store {
    holders: BTreeMap<i32, Holder>,
    pet_types: Vec<PetType>,
    next_holder_id: i32,
    next_pet_id: i32,
    next_visit_id: i32,
}

impl Store {
    fn next(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    /// Merge `holder` into the store and return the stored aggregate.
    ///
    /// A new holder is inserted whole. For a saved holder, only its own fields
    /// are overwritten; new pets and new visits are appended, existing pets
    /// have their fields updated, and stored records missing from `holder`
    /// are kept.
    fn save(&mut self, holder: Holder) -> Result<Holder, ClinicError> {
        let Some(holder_id) = holder.id else {
            return Ok(self.insert_new(holder));
        };

        let mut next_pet_id = self.next_pet_id;
        let mut next_visit_id = self.next_visit_id;
        let stored = self
            .holders
            .get_mut(&holder_id)
            .ok_or_else(|| ClinicError::NotFound(format!("Holder {} not found", holder_id)))?;

        stored.first_name = holder.first_name;
        stored.last_name = holder.last_name;
        stored.address = holder.address;
        stored.city = holder.city;
        stored.telephone = holder.telephone;

        for pet in holder.pets {
            let pet_id = match pet.id {
                None => {
                    let mut pet = pet;
                    let pet_id = Self::next(&mut next_pet_id);
                    pet.id = Some(pet_id);
                    pet.holder_id = Some(holder_id);
                    for visit in &mut pet.visits {
                        visit.id = Some(Self::next(&mut next_visit_id));
                        visit.pet_id = Some(pet_id);
                    }
                    stored.pets.push(pet);
                    continue;
                }
                Some(id) => id,
            };

            // Pets of other holders are left alone
            let Some(existing) = stored.pet_mut(pet_id) else {
                continue;
            };
            existing.name = pet.name;
            existing.birth_date = pet.birth_date;
            if pet.pet_type.is_some() {
                existing.pet_type = pet.pet_type;
            }
            for mut visit in pet.visits.into_iter().filter(|v| v.is_new()) {
                visit.id = Some(Self::next(&mut next_visit_id));
                visit.pet_id = Some(pet_id);
                existing.visits.push(visit);
            }
        }

        let merged = stored.clone();
        self.next_pet_id = next_pet_id;
        self.next_visit_id = next_visit_id;
        Ok(merged)
    }

    fn insert_new(&mut self, mut holder: Holder) -> Holder {
        let holder_id = Self::next(&mut self.next_holder_id);
        holder.id = Some(holder_id);

        for pet in &mut holder.pets {
            let pet_id = Self::next(&mut self.next_pet_id);
            pet.id = Some(pet_id);
            pet.holder_id = Some(holder_id);

            for visit in &mut pet.visits {
                visit.id = Some(Self::next(&mut self.next_visit_id));
                visit.pet_id = Some(pet_id);
            }
        }

        self.holders.insert(holder_id, holder.clone());
        holder
    }
}

/// Process-local [`HolderRepository`].
#[derive(Debug)]
pub struct InMemoryHolderRepository {
    store: RwLock<Store>,
    save_count: AtomicUsize,
}

impl InMemoryHolderRepository {
    /// Empty repository with the standard pet types.
    pub fn new() -> Self {
        Self::with_pet_types(sample::pet_types())
    }

    pub fn with_pet_types(pet_types: Vec<PetType>) -> Self {
        Self {
            store: RwLock::new(Store {
                pet_types,
                ..Store::default()
            }),
            save_count: AtomicUsize::new(0),
        }
    }

    /// Repository seeded with the sample clinic records.
    pub fn with_sample_data() -> Self {
        let pet_types = sample::pet_types();
        let mut store = Store {
            pet_types: pet_types.clone(),
            ..Store::default()
        };
        for holder in sample::holders(&pet_types) {
            store.insert_new(holder);
        }
        Self {
            store: RwLock::new(store),
            save_count: AtomicUsize::new(0),
        }
    }

    /// Store a holder directly, bypassing the save counter.
    pub async fn insert(&self, holder: Holder) -> Result<Holder, ClinicError> {
        self.store.write().await.save(holder)
    }

    /// Number of `save` calls made through the repository trait.
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryHolderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl HolderRepository for InMemoryHolderRepository {
    async fn find_pet_types(&self) -> Result<Vec<PetType>, ClinicError> {
        let mut types = self.store.read().await.pet_types.clone();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(types)
    }

    #[instrument(skip_all, fields(last_name = %last_name, page = pageable.page))]
    async fn find_by_last_name(
        &self,
        last_name: &str,
        pageable: Pageable,
    ) -> Result<Page<Holder>, ClinicError> {
        let store = self.store.read().await;
        let matching: Vec<&Holder> = store
            .holders
            .values()
            .filter(|h| h.last_name.starts_with(last_name))
            .collect();

        let total_elements = matching.len() as u64;
        let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(offset)
            .take(pageable.size as usize)
            .cloned()
            .collect();

        Ok(Page {
            content,
            number: pageable.page,
            size: pageable.size,
            total_elements,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Holder>, ClinicError> {
        Ok(self.store.read().await.holders.get(&id).cloned())
    }

    #[instrument(skip_all, fields(holder_id = ?holder.id))]
    async fn save(&self, holder: Holder) -> Result<Holder, ClinicError> {
        self.save_count.fetch_add(1, Ordering::SeqCst);
        let saved = self.store.write().await.save(holder)?;
        debug!(target: "clinic.repositories.memory", holder_id = ?saved.id, "Saved holder");
        Ok(saved)
    }

    async fn ping(&self) -> Result<(), ClinicError> {
        Ok(())
    }
}
