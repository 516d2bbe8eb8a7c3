use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::extractors::current_session::CurrentSession;
use crate::params::category_item::{EditItemParams, NewItemParams};
use crate::view;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use domain::error::{EntityErrorKind, Error as DomainError};
use domain::session::LoginSession;
use domain::{
    categories, category as CategoryApi, category_item as CategoryItemApi, category_items, Id,
};

use log::*;

/// The ownership gate: mutations are allowed only for the user id bound into
/// the session at login.
fn ensure_owner(login_session: &LoginSession, item: &category_items::Model) -> Result<(), Error> {
    if login_session.user_id == Some(item.user_id) {
        Ok(())
    } else {
        warn!("Rejected mutation of item {} by a non-owner", item.id);
        Err(Error(DomainError::entity(EntityErrorKind::Unauthorized)))
    }
}

/// Resolves the `/catalog/:category/:item` path pair to database rows.
/// Unknown names surface as structured 404s.
async fn find_category_and_item(
    app_state: &AppState,
    category_name: &str,
    item_name: &str,
) -> Result<(categories::Model, category_items::Model), Error> {
    let category = CategoryApi::find_by_name(app_state.db_conn_ref(), category_name).await?;
    let item =
        CategoryItemApi::find_by_name(app_state.db_conn_ref(), item_name, category.id).await?;

    Ok((category, item))
}

/// GET the new-item form with a category select box.
pub async fn new_item(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let categories = CategoryApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Html(view::new_item_page(&login_session, &categories)))
}

/// POST create a new item in the category named by the form.
pub async fn create_item(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
    Form(params): Form<NewItemParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New CategoryItem from: {params:?}");

    let category = CategoryApi::find_by_name(app_state.db_conn_ref(), &params.category).await?;
    let user_id = login_session.user_id.unwrap_or_else(Id::nil);

    let item_model = category_items::Model {
        id: Id::nil(),
        category_id: category.id,
        item_name: params.item_name,
        description: params.description.filter(|description| !description.is_empty()),
        user_id,
        created_at: chrono::Utc::now().into(),
        updated_at: chrono::Utc::now().into(),
    };

    let item = CategoryItemApi::create(app_state.db_conn_ref(), item_model, user_id).await?;

    info!("Created item {} ({})", item.item_name, item.id);

    Ok(Redirect::to("/catalog"))
}

/// GET all items of a category, addressed by category name.
pub async fn category_items(
    CurrentSession(login_session): CurrentSession,
    State(app_state): State<AppState>,
    Path(category_name): Path<String>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET items of category {category_name}");

    let category = CategoryApi::find_by_name(app_state.db_conn_ref(), &category_name).await?;
    let items = CategoryItemApi::find_by_category(app_state.db_conn_ref(), category.id).await?;

    Ok(Html(view::items_page(&login_session, &category, &items)))
}

/// GET one item's description page.
pub async fn show_item(
    CurrentSession(login_session): CurrentSession,
    State(app_state): State<AppState>,
    Path((category_name, item_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET item {item_name} in category {category_name}");

    let (category, item) = find_category_and_item(&app_state, &category_name, &item_name).await?;

    Ok(Html(view::item_page(&login_session, &category, &item)))
}

/// GET the edit form for an item. Owner only.
pub async fn edit_item(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((category_name, item_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    let (category, item) = find_category_and_item(&app_state, &category_name, &item_name).await?;
    ensure_owner(&login_session, &item)?;

    let categories = CategoryApi::find_all(app_state.db_conn_ref()).await?;

    Ok(Html(view::edit_item_page(
        &login_session,
        &category,
        &categories,
        &item,
    )))
}

/// POST update an item. Owner only; empty form fields leave the stored value
/// unchanged, a submitted category name moves the item into that category.
pub async fn update_item(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((category_name, item_name)): Path<(String, String)>,
    Form(params): Form<EditItemParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Update CategoryItem {item_name} with: {params:?}");

    let (_category, item) = find_category_and_item(&app_state, &category_name, &item_name).await?;
    ensure_owner(&login_session, &item)?;

    let (item_name, description, category) = params.normalized();
    let category_id = match category {
        Some(name) => Some(CategoryApi::find_by_name(app_state.db_conn_ref(), &name).await?.id),
        None => None,
    };
    let updated = CategoryItemApi::update(
        app_state.db_conn_ref(),
        item.id,
        item_name,
        description,
        category_id,
    )
    .await?;

    info!("Updated item {} ({})", updated.item_name, updated.id);

    Ok(Redirect::to("/catalog"))
}

/// GET the delete confirmation page for an item. Owner only.
pub async fn delete_item(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((category_name, item_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    let (category, item) = find_category_and_item(&app_state, &category_name, &item_name).await?;
    ensure_owner(&login_session, &item)?;

    Ok(Html(view::delete_item_page(
        &login_session,
        &category,
        &item,
    )))
}

/// POST delete an item. Owner only.
pub async fn destroy_item(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path((category_name, item_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, Error> {
    let (_category, item) = find_category_and_item(&app_state, &category_name, &item_name).await?;
    ensure_owner(&login_session, &item)?;

    CategoryItemApi::delete_by_id(app_state.db_conn_ref(), item.id).await?;

    info!("Deleted item {} ({})", item.item_name, item.id);

    Ok(Redirect::to("/catalog"))
}
