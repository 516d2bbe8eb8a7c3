use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::params::category::NewCategoryParams;
use crate::view;
use crate::{AppState, Error};
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use domain::{categories, category as CategoryApi, Id};

use log::*;

/// GET the new-category form. Auth is enforced by the router middleware.
pub async fn new_category(
    AuthenticatedUser(login_session): AuthenticatedUser,
) -> Result<impl IntoResponse, Error> {
    Ok(Html(view::new_category_page(&login_session)))
}

/// POST create a new category owned by the logged-in user.
pub async fn create_category(
    AuthenticatedUser(login_session): AuthenticatedUser,
    State(app_state): State<AppState>,
    Form(params): Form<NewCategoryParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Category from: {params:?}");

    // The extractor guarantees a bound user id.
    let user_id = login_session.user_id.unwrap_or_else(Id::nil);

    let category_model = categories::Model {
        id: Id::nil(),
        category_name: params.category_name,
        user_id,
        created_at: chrono::Utc::now().into(),
        updated_at: chrono::Utc::now().into(),
    };

    let category =
        CategoryApi::create(app_state.db_conn_ref(), category_model, user_id).await?;

    info!("Created category {} ({})", category.category_name, category.id);

    Ok(Redirect::to("/catalog"))
}
