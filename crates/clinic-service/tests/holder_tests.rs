//! Holder form integration tests.
//!
//! Drives a real server over HTTP against an in-memory repository.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use clinic_service::repositories::HolderRepository;
use clinic_test_utils::fixtures;
use clinic_test_utils::TestClinicServer;
use std::sync::Arc;

fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_create_holder_then_show() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;
    let client = server.client();

    let response = client
        .post(format!("{}/holders/new", server.url()))
        .form(&[
            ("firstName", "Joe"),
            ("lastName", "Bloggs"),
            ("address", "123 Caramel Street"),
            ("city", "London"),
            ("telephone", "1316761638"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 302);
    assert_eq!(location(&response), "/holders/1");

    let body: serde_json::Value = client
        .get(format!("{}/holders/1", server.url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["view"], "holders/holderDetails");
    assert_eq!(body["model"]["holder"]["lastName"], "Bloggs");
    assert_eq!(body["model"]["holder"]["pets"].as_array().unwrap().len(), 0);

    Ok(())
}

#[tokio::test]
async fn test_create_holder_rejects_long_telephone() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let response = server
        .client()
        .post(format!("{}/holders/new", server.url()))
        .form(&[
            ("firstName", "Joe"),
            ("lastName", "Bloggs"),
            ("address", "123 Caramel Street"),
            ("city", "London"),
            ("telephone", "013167616381234"),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["errors"]["holder"][0]["field"], "telephone");
    assert_eq!(body["errors"]["holder"][0]["code"], "Digits");
    assert_eq!(server.repository().save_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_create_holder_rejects_values_longer_than_columns() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;
    let first_name = "J".repeat(40);
    let telephone = format!("{}{}", "0".repeat(15), "6085551023");

    let response = server
        .client()
        .post(format!("{}/holders/new", server.url()))
        .form(&[
            ("firstName", first_name.as_str()),
            ("lastName", "Bloggs"),
            ("address", "123 Caramel Street"),
            ("city", "London"),
            ("telephone", telephone.as_str()),
        ])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    let errors = body["errors"]["holder"].as_array().unwrap();
    let rejected: Vec<(&str, &str)> = errors
        .iter()
        .filter_map(|e| Some((e["field"].as_str()?, e["code"].as_str()?)))
        .collect();
    assert_eq!(rejected, [("firstName", "Size"), ("telephone", "Size")]);
    assert_eq!(server.repository().save_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_find_holders() -> Result<()> {
    let server = TestClinicServer::spawn_with_sample_data().await?;
    let client = server.client();

    // Two matches: list view
    let body: serde_json::Value = client
        .get(format!("{}/holders?lastName=Davis", server.url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["view"], "holders/holdersList");
    assert_eq!(body["model"]["totalItems"], 2);
    assert_eq!(body["model"]["currentPage"], 1);

    // One match: redirect
    let response = client
        .get(format!("{}/holders?lastName=Coleman", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), 302);
    assert_eq!(location(&response), "/holders/6");

    // No match: search form with error
    let body: serde_json::Value = client
        .get(format!("{}/holders?lastName=Nobody", server.url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["view"], "holders/findHolders");
    assert_eq!(body["model"]["holder"]["lastName"], "Nobody");
    assert_eq!(body["errors"]["holder"][0]["message"], "not found");

    Ok(())
}

#[tokio::test]
async fn test_find_form_is_empty() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let body: serde_json::Value = reqwest::get(format!("{}/holders/find", server.url()))
        .await?
        .json()
        .await?;
    assert_eq!(body["view"], "holders/findHolders");
    assert_eq!(body["model"]["holder"]["lastName"], "");
    assert!(body.get("errors").is_none());

    Ok(())
}

#[tokio::test]
async fn test_edit_holder() -> Result<()> {
    let repository = Arc::new(clinic_service::repositories::InMemoryHolderRepository::new());
    let george = repository.insert(fixtures::george()).await?;
    let holder_id = george.id.unwrap();
    let server = TestClinicServer::spawn(repository).await?;
    let client = server.client();

    let body: serde_json::Value = client
        .get(format!("{}/holders/{}/edit", server.url(), holder_id))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["view"], "holders/createOrUpdateHolderForm");
    assert_eq!(body["model"]["holder"]["firstName"], "George");

    let response = client
        .post(format!("{}/holders/{}/edit", server.url(), holder_id))
        .form(&[
            ("firstName", "Joe"),
            ("lastName", "Bloggs"),
            ("address", "123 Caramel Street"),
            ("city", "London"),
            ("telephone", "1616291589"),
        ])
        .send()
        .await?;
    assert_eq!(response.status(), 302);
    assert_eq!(location(&response), format!("/holders/{}", holder_id));

    let saved = server.repository().find_by_id(holder_id).await?.unwrap();
    assert_eq!(saved.last_name, "Bloggs");
    assert_eq!(saved.pets.len(), 1, "pets survive a holder edit");

    Ok(())
}

#[tokio::test]
async fn test_edit_holder_with_blank_field_is_rejected() -> Result<()> {
    let server = TestClinicServer::spawn_with_sample_data().await?;

    let response = server
        .client()
        .post(format!("{}/holders/1/edit", server.url()))
        .form(&[("address", "  ")])
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["errors"]["holder"][0]["field"], "address");
    assert_eq!(body["errors"]["holder"][0]["code"], "NotBlank");

    let unchanged = server.repository().find_by_id(1).await?.unwrap();
    assert_eq!(unchanged.address, "110 W. Liberty St.");

    Ok(())
}

#[tokio::test]
async fn test_unknown_holder_returns_404() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let response = reqwest::get(format!("{}/holders/42", server.url())).await?;
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    Ok(())
}
