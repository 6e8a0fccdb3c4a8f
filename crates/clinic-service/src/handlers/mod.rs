//! HTTP request handlers for the clinic service.
//!
//! Form handlers return a [`View`](crate::views::View): either a rendered
//! view with its model, or a redirect after a successful submission.

pub mod health;
pub mod holders;
pub mod metrics;
pub mod pets;
pub mod visits;

pub use health::{health_check, readiness_check};
pub use holders::{
    init_creation_form, init_find_form, init_update_form, process_creation_form,
    process_find_form, process_update_form, show_holder,
};
pub use metrics::metrics_handler;
pub use pets::{
    init_pet_creation_form, init_pet_update_form, process_pet_creation_form,
    process_pet_update_form,
};
pub use visits::{init_new_visit_form, process_new_visit_form};

use crate::errors::ClinicError;
use crate::models::Holder;
use crate::routes::AppState;

/// Load a holder or fail with `NotFound`.
pub(crate) async fn find_holder(state: &AppState, holder_id: i32) -> Result<Holder, ClinicError> {
    state
        .holders
        .find_by_id(holder_id)
        .await?
        .ok_or_else(|| ClinicError::NotFound(format!("Holder {} not found", holder_id)))
}
