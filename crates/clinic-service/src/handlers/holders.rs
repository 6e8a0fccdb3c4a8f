//! Holder handlers.
//!
//! - `GET  /holders/new` - empty holder form
//! - `POST /holders/new` - create a holder
//! - `GET  /holders/find` - search form
//! - `GET  /holders?lastName=&page=` - search by last-name prefix
//! - `GET  /holders/{holderId}` - holder details with pets and visits
//! - `GET  /holders/{holderId}/edit` - holder form preloaded
//! - `POST /holders/{holderId}/edit` - update a holder

use super::find_holder;
use crate::errors::ClinicError;
use crate::forms::holder::{bind_holder, validate_holder};
use crate::forms::{codes, BindingResult, FormData};
use crate::models::{Holder, Pageable};
use crate::observability::metrics::{record_created, record_form_rejection};
use crate::routes::AppState;
use crate::views::{ModelAndView, View, FIND_HOLDERS, HOLDERS_LIST, HOLDER_DETAILS, HOLDER_FORM};
use axum::extract::{Path, Query, State};
use axum::Form;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Query parameters of the holder search.
#[derive(Debug, Default, Deserialize)]
pub struct FindHoldersQuery {
    /// 1-based page number (default 1).
    pub page: Option<u32>,

    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
}

fn holder_form(holder: &Holder, result: BindingResult) -> Result<View, ClinicError> {
    Ok(ModelAndView::new(HOLDER_FORM)
        .with("holder", holder)?
        .with_errors("holder", result)
        .into())
}

/// Handler for GET /holders/new
pub async fn init_creation_form() -> Result<View, ClinicError> {
    holder_form(&Holder::new(), BindingResult::new())
}

/// Handler for POST /holders/new
///
/// Redirects to the new holder's page, or renders the form again with field
/// errors.
#[instrument(skip_all)]
pub async fn process_creation_form(
    State(state): State<Arc<AppState>>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<View, ClinicError> {
    let form = FormData::new(params);
    let mut holder = Holder::new();
    bind_holder(&mut holder, &form);

    let mut result = BindingResult::new();
    validate_holder(&holder, &mut result);
    if result.has_errors() {
        record_form_rejection("holder");
        return holder_form(&holder, result);
    }

    let saved = state.holders.save(holder).await?;
    let holder_id = saved.id.ok_or(ClinicError::Internal)?;

    record_created("holder");
    info!(target: "clinic.handlers.holders", holder_id, "Holder created");

    Ok(View::redirect(format!("/holders/{}", holder_id)))
}

/// Handler for GET /holders/find
pub async fn init_find_form() -> Result<View, ClinicError> {
    Ok(ModelAndView::new(FIND_HOLDERS)
        .with("holder", &Holder::new())?
        .into())
}

/// Handler for GET /holders
///
/// A missing `lastName` matches every holder. No match renders the search
/// form with a `notFound` error, a single match redirects to that holder,
/// anything else renders one page of the result list.
#[instrument(skip_all, fields(page = ?query.page))]
pub async fn process_find_form(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FindHoldersQuery>,
) -> Result<View, ClinicError> {
    let page = query.page.unwrap_or(1).max(1);
    let last_name = query.last_name.unwrap_or_default();

    let results = state
        .holders
        .find_by_last_name(&last_name, Pageable::new(page - 1, state.config.page_size))
        .await?;

    if results.is_empty() {
        let holder = Holder {
            last_name,
            ..Holder::new()
        };
        let mut result = BindingResult::new();
        result.reject_value("lastName", codes::NOT_FOUND, "not found");
        return Ok(ModelAndView::new(FIND_HOLDERS)
            .with("holder", &holder)?
            .with_errors("holder", result)
            .into());
    }

    if results.total_elements == 1 {
        if let Some(holder_id) = results.content.first().and_then(|h| h.id) {
            return Ok(View::redirect(format!("/holders/{}", holder_id)));
        }
    }

    Ok(ModelAndView::new(HOLDERS_LIST)
        .with("currentPage", &page)?
        .with("totalPages", &results.total_pages())?
        .with("totalItems", &results.total_elements)?
        .with("listHolders", &results.content)?
        .into())
}

/// Handler for GET /holders/{holderId}/edit
#[instrument(skip(state))]
pub async fn init_update_form(
    State(state): State<Arc<AppState>>,
    Path(holder_id): Path<i32>,
) -> Result<View, ClinicError> {
    let holder = find_holder(&state, holder_id).await?;
    holder_form(&holder, BindingResult::new())
}

/// Handler for POST /holders/{holderId}/edit
///
/// Binds onto the stored holder; fields absent from the submission keep their
/// stored value. The path id always wins over anything submitted.
#[instrument(skip(state, params))]
pub async fn process_update_form(
    State(state): State<Arc<AppState>>,
    Path(holder_id): Path<i32>,
    Form(params): Form<HashMap<String, String>>,
) -> Result<View, ClinicError> {
    let mut holder = find_holder(&state, holder_id).await?;
    bind_holder(&mut holder, &FormData::new(params));

    let mut result = BindingResult::new();
    validate_holder(&holder, &mut result);
    if result.has_errors() {
        record_form_rejection("holder");
        return holder_form(&holder, result);
    }

    holder.id = Some(holder_id);
    state.holders.save(holder).await?;

    info!(target: "clinic.handlers.holders", holder_id, "Holder updated");

    Ok(View::redirect(format!("/holders/{}", holder_id)))
}

/// Handler for GET /holders/{holderId}
#[instrument(skip(state))]
pub async fn show_holder(
    State(state): State<Arc<AppState>>,
    Path(holder_id): Path<i32>,
) -> Result<View, ClinicError> {
    let holder = find_holder(&state, holder_id).await?;
    Ok(ModelAndView::new(HOLDER_DETAILS)
        .with("holder", &holder)?
        .into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::super::test_support::{app, body_json, get, location, post_form};
    use crate::repositories::{HolderRepository, InMemoryHolderRepository};
    use axum::http::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_init_creation_form() {
        let repo = Arc::new(InMemoryHolderRepository::new());
        let response = get(app(repo), "/holders/new").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["view"], "holders/createOrUpdateHolderForm");
        assert!(body["model"].get("holder").is_some());
    }

    #[tokio::test]
    async fn test_process_creation_form_success() {
        let repo = Arc::new(InMemoryHolderRepository::new());
        let response = post_form(
            app(repo.clone()),
            "/holders/new",
            &[
                ("firstName", "Joe"),
                ("lastName", "Bloggs"),
                ("address", "123 Caramel Street"),
                ("city", "London"),
                ("telephone", "01316761638"),
            ],
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/holders/1");
        assert_eq!(repo.save_count(), 1);
        let saved = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(saved.city, "London");
    }

    #[tokio::test]
    async fn test_process_creation_form_has_errors() {
        let repo = Arc::new(InMemoryHolderRepository::new());
        let response = post_form(
            app(repo.clone()),
            "/holders/new",
            &[("firstName", "Joe"), ("lastName", "Bloggs"), ("city", "London")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["view"], "holders/createOrUpdateHolderForm");
        let fields: Vec<&str> = body["errors"]["holder"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert!(fields.contains(&"address"));
        assert!(fields.contains(&"telephone"));
        assert_eq!(repo.save_count(), 0);
    }

    #[tokio::test]
    async fn test_process_find_form_by_prefix_lists_page() {
        let repo = Arc::new(InMemoryHolderRepository::with_sample_data());
        let response = get(app(repo), "/holders?page=2").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["view"], "holders/holdersList");
        assert_eq!(body["model"]["currentPage"], 2);
        assert_eq!(body["model"]["totalPages"], 2);
        assert_eq!(body["model"]["totalItems"], 10);
        assert_eq!(body["model"]["listHolders"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_process_find_form_single_match_redirects() {
        let repo = Arc::new(InMemoryHolderRepository::with_sample_data());
        let response = get(app(repo), "/holders?page=1&lastName=Franklin").await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/holders/1");
    }

    #[tokio::test]
    async fn test_process_find_form_no_match() {
        let repo = Arc::new(InMemoryHolderRepository::with_sample_data());
        let response = get(app(repo), "/holders?page=1&lastName=Unknown%20Surname").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["view"], "holders/findHolders");
        assert_eq!(body["errors"]["holder"][0]["field"], "lastName");
        assert_eq!(body["errors"]["holder"][0]["code"], "notFound");
    }

    #[tokio::test]
    async fn test_process_update_form_keeps_omitted_fields() {
        let repo = Arc::new(InMemoryHolderRepository::with_sample_data());
        let response = post_form(app(repo.clone()), "/holders/1/edit", &[("city", "London")]).await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/holders/1");
        let holder = repo.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(holder.city, "London");
        assert_eq!(holder.first_name, "George");
    }

    #[tokio::test]
    async fn test_process_update_form_ignores_submitted_id() {
        let repo = Arc::new(InMemoryHolderRepository::with_sample_data());
        let response = post_form(
            app(repo.clone()),
            "/holders/1/edit",
            &[("id", "5"), ("firstName", "Georgina")],
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(repo.find_by_id(1).await.unwrap().unwrap().first_name, "Georgina");
        assert_eq!(repo.find_by_id(5).await.unwrap().unwrap().first_name, "Peter");
    }

    #[tokio::test]
    async fn test_show_unknown_holder_is_not_found() {
        let repo = Arc::new(InMemoryHolderRepository::new());
        let response = get(app(repo), "/holders/404").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
