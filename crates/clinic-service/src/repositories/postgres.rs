//! PostgreSQL holder repository.
//!
//! A holder is loaded with two follow-up queries (pets with their types, then
//! visits) batched over all holder ids in the result, so a page of holders
//! costs three queries. Saving runs in one transaction.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - `LIKE` wildcards in search input are escaped

use super::HolderRepository;
use crate::errors::ClinicError;
use crate::models::{Holder, Page, Pageable, Pet, PetType, Visit};
use crate::observability::metrics::record_repository_query;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;
use tracing::{debug, instrument};

#[derive(Debug, sqlx::FromRow)]
struct HolderRow {
    id: i32,
    first_name: String,
    last_name: String,
    address: String,
    city: String,
    telephone: String,
}

impl From<HolderRow> for Holder {
    fn from(row: HolderRow) -> Self {
        Holder {
            id: Some(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            address: row.address,
            city: row.city,
            telephone: row.telephone,
            pets: Vec::new(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PetRow {
    id: i32,
    holder_id: i32,
    name: String,
    birth_date: Option<NaiveDate>,
    type_id: Option<i32>,
    type_name: Option<String>,
}

impl From<PetRow> for Pet {
    fn from(row: PetRow) -> Self {
        let pet_type = match (row.type_id, row.type_name) {
            (Some(id), Some(name)) => Some(PetType { id, name }),
            _ => None,
        };
        Pet {
            id: Some(row.id),
            holder_id: Some(row.holder_id),
            name: row.name,
            birth_date: row.birth_date,
            pet_type,
            visits: Vec::new(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct VisitRow {
    id: i32,
    pet_id: i32,
    visit_date: NaiveDate,
    description: String,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            id: Some(row.id),
            pet_id: Some(row.pet_id),
            date: Some(row.visit_date),
            description: row.description,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PetTypeRow {
    id: i32,
    name: String,
}

/// Escape `LIKE` wildcards so user input matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Run a repository operation and record its duration.
async fn timed<T, F>(operation: &'static str, fut: F) -> Result<T, ClinicError>
where
    F: Future<Output = Result<T, ClinicError>>,
{
    let start = Instant::now();
    let result = fut.await;
    record_repository_query(operation, result.is_ok(), start.elapsed());
    result
}

/// [`HolderRepository`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgHolderRepository {
    pool: PgPool,
}

impl PgHolderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach pets (with types) and their visits to the given holders.
    async fn load_pets(&self, holders: &mut [Holder]) -> Result<(), ClinicError> {
        let holder_ids: Vec<i32> = holders.iter().filter_map(|h| h.id).collect();
        if holder_ids.is_empty() {
            return Ok(());
        }

        let pet_rows: Vec<PetRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.holder_id, p.name, p.birth_date,
                   t.id AS type_id, t.name AS type_name
            FROM pets p
            LEFT JOIN pet_types t ON p.type_id = t.id
            WHERE p.holder_id = ANY($1)
            ORDER BY p.id
            "#,
        )
        .bind(&holder_ids)
        .fetch_all(&self.pool)
        .await?;

        let pet_ids: Vec<i32> = pet_rows.iter().map(|r| r.id).collect();
        let visit_rows: Vec<VisitRow> = if pet_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as(
                r#"
                SELECT id, pet_id, visit_date, description
                FROM visits
                WHERE pet_id = ANY($1)
                ORDER BY visit_date, id
                "#,
            )
            .bind(&pet_ids)
            .fetch_all(&self.pool)
            .await?
        };

        let mut visits_by_pet: HashMap<i32, Vec<Visit>> = HashMap::new();
        for row in visit_rows {
            visits_by_pet.entry(row.pet_id).or_default().push(row.into());
        }

        let mut pets_by_holder: HashMap<i32, Vec<Pet>> = HashMap::new();
        for row in pet_rows {
            let holder_id = row.holder_id;
            let mut pet: Pet = row.into();
            if let Some(id) = pet.id {
                pet.visits = visits_by_pet.remove(&id).unwrap_or_default();
            }
            pets_by_holder.entry(holder_id).or_default().push(pet);
        }

        for holder in holders.iter_mut() {
            if let Some(id) = holder.id {
                holder.pets = pets_by_holder.remove(&id).unwrap_or_default();
            }
        }

        Ok(())
    }

    async fn save_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        mut holder: Holder,
    ) -> Result<Holder, ClinicError> {
        let holder_id = match holder.id {
            None => {
                let id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO holders (first_name, last_name, address, city, telephone)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&holder.first_name)
                .bind(&holder.last_name)
                .bind(&holder.address)
                .bind(&holder.city)
                .bind(&holder.telephone)
                .fetch_one(&mut **tx)
                .await?;
                id
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE holders
                    SET first_name = $2, last_name = $3, address = $4, city = $5, telephone = $6
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .bind(&holder.first_name)
                .bind(&holder.last_name)
                .bind(&holder.address)
                .bind(&holder.city)
                .bind(&holder.telephone)
                .execute(&mut **tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(ClinicError::NotFound(format!("Holder {} not found", id)));
                }
                id
            }
        };
        holder.id = Some(holder_id);

        for pet in &mut holder.pets {
            let type_id = pet.pet_type.as_ref().map(|t| t.id);
            let pet_id = match pet.id {
                None => {
                    let id: i32 = sqlx::query_scalar(
                        r#"
                        INSERT INTO pets (name, birth_date, type_id, holder_id)
                        VALUES ($1, $2, $3, $4)
                        RETURNING id
                        "#,
                    )
                    .bind(&pet.name)
                    .bind(pet.birth_date)
                    .bind(type_id)
                    .bind(holder_id)
                    .fetch_one(&mut **tx)
                    .await?;
                    id
                }
                Some(id) => {
                    sqlx::query(
                        r#"
                        UPDATE pets
                        SET name = $3, birth_date = $4, type_id = COALESCE($5, type_id)
                        WHERE id = $1 AND holder_id = $2
                        "#,
                    )
                    .bind(id)
                    .bind(holder_id)
                    .bind(&pet.name)
                    .bind(pet.birth_date)
                    .bind(type_id)
                    .execute(&mut **tx)
                    .await?;
                    id
                }
            };
            pet.id = Some(pet_id);
            pet.holder_id = Some(holder_id);

            for visit in pet.visits.iter_mut().filter(|v| v.is_new()) {
                let visit_date = visit.date.ok_or_else(|| {
                    ClinicError::BadRequest("Visit date is required".to_string())
                })?;
                let id: i32 = sqlx::query_scalar(
                    r#"
                    INSERT INTO visits (pet_id, visit_date, description)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    "#,
                )
                .bind(pet_id)
                .bind(visit_date)
                .bind(&visit.description)
                .fetch_one(&mut **tx)
                .await?;
                visit.id = Some(id);
                visit.pet_id = Some(pet_id);
            }
        }

        Ok(holder)
    }
}

#[async_trait::async_trait]
impl HolderRepository for PgHolderRepository {
    #[instrument(skip_all)]
    async fn find_pet_types(&self) -> Result<Vec<PetType>, ClinicError> {
        timed("find_pet_types", async {
            let rows: Vec<PetTypeRow> =
                sqlx::query_as("SELECT id, name FROM pet_types ORDER BY name")
                    .fetch_all(&self.pool)
                    .await?;
            Ok::<_, ClinicError>(rows
                .into_iter()
                .map(|r| PetType {
                    id: r.id,
                    name: r.name,
                })
                .collect())
        })
        .await
    }

    #[instrument(skip_all, fields(last_name = %last_name, page = pageable.page))]
    async fn find_by_last_name(
        &self,
        last_name: &str,
        pageable: Pageable,
    ) -> Result<Page<Holder>, ClinicError> {
        timed("find_by_last_name", async {
            let pattern = like_prefix(last_name);

            let total: i64 = sqlx::query_scalar(
                r#"SELECT COUNT(*) FROM holders WHERE last_name LIKE $1 ESCAPE '\'"#,
            )
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await?;

            let offset = i64::try_from(pageable.offset()).unwrap_or(i64::MAX);
            let rows: Vec<HolderRow> = sqlx::query_as(
                r#"
                SELECT id, first_name, last_name, address, city, telephone
                FROM holders
                WHERE last_name LIKE $1 ESCAPE '\'
                ORDER BY id
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(&pattern)
            .bind(i64::from(pageable.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            let mut content: Vec<Holder> = rows.into_iter().map(Holder::from).collect();
            self.load_pets(&mut content).await?;

            Ok::<_, ClinicError>(Page {
                content,
                number: pageable.page,
                size: pageable.size,
                total_elements: u64::try_from(total).unwrap_or(0),
            })
        })
        .await
    }

    #[instrument(skip_all, fields(holder_id = id))]
    async fn find_by_id(&self, id: i32) -> Result<Option<Holder>, ClinicError> {
        timed("find_by_id", async {
            let row: Option<HolderRow> = sqlx::query_as(
                r#"
                SELECT id, first_name, last_name, address, city, telephone
                FROM holders
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            let Some(row) = row else {
                return Ok::<_, ClinicError>(None);
            };

            let mut holders = [Holder::from(row)];
            self.load_pets(&mut holders).await?;
            let [holder] = holders;
            Ok::<_, ClinicError>(Some(holder))
        })
        .await
    }

    #[instrument(skip_all, fields(holder_id = ?holder.id))]
    async fn save(&self, holder: Holder) -> Result<Holder, ClinicError> {
        timed("save", async {
            let mut tx = self.pool.begin().await?;
            let saved = Self::save_in_tx(&mut tx, holder).await?;
            tx.commit().await?;

            debug!(target: "clinic.repositories.postgres", holder_id = ?saved.id, "Saved holder");
            Ok::<_, ClinicError>(saved)
        })
        .await
    }

    async fn ping(&self) -> Result<(), ClinicError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
