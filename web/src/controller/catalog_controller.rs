use crate::extractors::current_session::CurrentSession;
use crate::view;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use domain::{category as CategoryApi, category_item as CategoryItemApi, Id};
use serde_json::json;

use log::*;

/// Number of recently added items shown on the home page.
const LATEST_ITEMS_LIMIT: u64 = 10;

/// GET the home page: all categories plus the latest items, rendered
/// publicly or privately by login status.
pub async fn home(
    CurrentSession(login_session): CurrentSession,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET catalog home page");

    let categories = CategoryApi::find_all(app_state.db_conn_ref()).await?;
    let latest =
        CategoryItemApi::find_latest(app_state.db_conn_ref(), LATEST_ITEMS_LIMIT).await?;

    Ok(Html(view::home_page(&login_session, &categories, &latest)))
}

/// GET all categories as JSON.
#[utoipa::path(
    get,
    path = "/category/JSON",
    responses(
        (status = 200, description = "All categories", body = [domain::categories::Model])
    )
)]
pub async fn categories_json(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all categories as JSON");

    let categories = CategoryApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(json!({"categories": categories})))
}

/// GET the items of one category as JSON.
#[utoipa::path(
    get,
    path = "/category/{category_id}/items/JSON",
    params(
        ("category_id" = Uuid, Path, description = "Category id whose items to list")
    ),
    responses(
        (status = 200, description = "Items of the category", body = [domain::category_items::Model]),
        (status = 404, description = "Category not found")
    )
)]
pub async fn category_items_json(
    State(app_state): State<AppState>,
    Path(category_id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET items of category {category_id} as JSON");

    // 404 for an unknown category rather than an empty list.
    CategoryApi::find_by_id(app_state.db_conn_ref(), category_id).await?;

    let params = crate::params::category_item::IndexParams { category_id };
    let items = CategoryItemApi::find_by(app_state.db_conn_ref(), params).await?;

    Ok(Json(json!({"category_items": items})))
}

/// GET the entire catalog, all categories and all items, as JSON.
#[utoipa::path(
    get,
    path = "/catalog/JSON",
    responses(
        (status = 200, description = "All categories and all items", body = [domain::categories::Model])
    )
)]
pub async fn catalog_json(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET full catalog as JSON");

    let categories = CategoryApi::find_all(app_state.db_conn_ref()).await?;
    let category_items = CategoryItemApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Json(
        json!({"categories": categories, "category_items": category_items}),
    ))
}
