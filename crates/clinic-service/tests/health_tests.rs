//! Health and metrics endpoint integration tests.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use clinic_test_utils::TestClinicServer;

#[tokio::test]
async fn test_health_endpoint_returns_ok() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let response = reqwest::get(format!("{}/health", server.url())).await?;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_ready_endpoint_reports_repository() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let response = reqwest::get(format!("{}/ready", server.url())).await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["repository"], "healthy");
    assert!(body.get("error").is_none());

    Ok(())
}

#[tokio::test]
async fn test_metrics_endpoint_is_text() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let response = reqwest::get(format!("{}/metrics", server.url())).await?;
    assert_eq!(response.status(), 200);
    assert!(response.text().await.is_ok());

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_returns_404() -> Result<()> {
    let server = TestClinicServer::spawn_empty().await?;

    let response = reqwest::get(format!("{}/vets", server.url())).await?;
    assert_eq!(response.status(), 404);

    Ok(())
}
