//! # Clinic Test Utilities
//!
//! Shared test utilities for the clinic service.
//!
//! This crate provides:
//! - Server test harness (`TestClinicServer` for E2E tests)
//! - Record fixtures (`fixtures`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use clinic_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestClinicServer::spawn_with_sample_data().await?;
//!
//!     let response = server
//!         .client()
//!         .get(format!("{}/holders/1", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
