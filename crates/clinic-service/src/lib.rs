//! Pet Clinic Service Library
//!
//! Form-driven HTTP service for a veterinary clinic:
//!
//! - Holder registration, search by last name, details and editing
//! - Pet registration and editing, per holder
//! - Visit booking, per pet
//!
//! # Architecture
//!
//! Handlers bind submitted forms onto domain models, validate them, and
//! persist whole holder aggregates through a repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> forms/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `forms` - Form binding and field validation
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Holder, pet, visit and paging models
//! - `observability` - Prometheus metrics
//! - `repositories` - Holder storage (Postgres and in-memory)
//! - `routes` - Axum router setup
//! - `views` - View names and rendered responses

pub mod config;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod views;
