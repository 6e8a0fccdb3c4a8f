//! Visit form integration tests.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use anyhow::Result;
use chrono::Utc;
use clinic_service::repositories::{HolderRepository, InMemoryHolderRepository};
use clinic_test_utils::{fixtures, TestClinicServer};
use std::sync::Arc;

async fn spawn_with_george() -> Result<(TestClinicServer, i32, i32)> {
    let repository = Arc::new(InMemoryHolderRepository::new());
    let george = repository.insert(fixtures::george()).await?;
    let holder_id = george.id.unwrap();
    let pet_id = george.pets[0].id.unwrap();
    Ok((TestClinicServer::spawn(repository).await?, holder_id, pet_id))
}

#[tokio::test]
async fn test_new_visit_form_defaults_to_today() -> Result<()> {
    let (server, holder_id, pet_id) = spawn_with_george().await?;

    let body: serde_json::Value = server
        .client()
        .get(format!(
            "{}/holders/{}/pets/{}/visits/new",
            server.url(),
            holder_id,
            pet_id
        ))
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["view"], "pets/createOrUpdateVisitForm");
    assert_eq!(
        body["model"]["visit"]["date"],
        Utc::now().date_naive().format("%Y-%m-%d").to_string()
    );
    assert_eq!(body["model"]["pet"]["visits"].as_array().unwrap().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_book_visit() -> Result<()> {
    let (server, holder_id, pet_id) = spawn_with_george().await?;

    let response = server
        .client()
        .post(format!(
            "{}/holders/{}/pets/{}/visits/new",
            server.url(),
            holder_id,
            pet_id
        ))
        .form(&[("date", "2024-02-29"), ("description", "Visit Description")])
        .send()
        .await?;

    assert_eq!(response.status(), 302);
    assert_eq!(server.repository().save_count(), 1);

    let holder = server.repository().find_by_id(holder_id).await?.unwrap();
    let visits = &holder.pet(pet_id).unwrap().visits;
    assert_eq!(visits.len(), 2);
    assert_eq!(visits[1].description, "Visit Description");
    assert_eq!(visits[1].pet_id, Some(pet_id));

    let details: serde_json::Value = server
        .client()
        .get(format!("{}/holders/{}", server.url(), holder_id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(details["model"]["holder"]["pets"][0]["visits"][1]["date"], "2024-02-29");

    Ok(())
}

#[tokio::test]
async fn test_book_visit_without_description_saves_nothing() -> Result<()> {
    let (server, holder_id, pet_id) = spawn_with_george().await?;

    let response = server
        .client()
        .post(format!(
            "{}/holders/{}/pets/{}/visits/new",
            server.url(),
            holder_id,
            pet_id
        ))
        .form(&[("date", "2024-02-29")])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["errors"]["visit"][0]["field"], "description");
    assert_eq!(body["model"]["visit"]["date"], "2024-02-29");
    assert_eq!(server.repository().save_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_book_visit_for_another_holders_pet_is_404() -> Result<()> {
    let server = TestClinicServer::spawn_with_sample_data().await?;

    // Pet 2 (Basil) belongs to holder 2, not holder 1
    let response = server
        .client()
        .post(format!("{}/holders/1/pets/2/visits/new", server.url()))
        .form(&[("date", "2024-02-29"), ("description", "checkup")])
        .send()
        .await?;

    assert_eq!(response.status(), 404);
    assert_eq!(server.repository().save_count(), 0);

    Ok(())
}
