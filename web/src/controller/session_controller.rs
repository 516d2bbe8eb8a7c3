use crate::params::session::ConnectParams;
use crate::view;
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use domain::error::{DomainErrorKind, Error as DomainError, InternalErrorKind};
use domain::login::{self, ConnectOutcome};
use domain::session::{LoginSession, SESSION_KEY};
use serde_json::json;
use tower_sessions::Session;

use log::*;

fn session_error(err: tower_sessions::session::Error) -> Error {
    Error(DomainError {
        source: Some(Box::new(err)),
        error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
            "Failed to access the session store".to_string(),
        )),
    })
}

/// GET the login page. Issues a fresh anti-forgery state token, stores it in
/// the session and embeds it in the rendered page. Only the state token is
/// refreshed; a connected identity in the session stays connected.
#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login page with embedded state token", body = String),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let mut login_session: LoginSession = session
        .get(SESSION_KEY)
        .await
        .map_err(session_error)?
        .unwrap_or_default();
    login_session.state_token = Some(login::generate_state_token());
    debug!("Issued new login state token");

    let client = login::google_client(&app_state.config)?;
    let authorization_url =
        client.get_authorization_url(login_session.state_token.as_deref().unwrap_or_default());

    session
        .insert(SESSION_KEY, &login_session)
        .await
        .map_err(session_error)?;

    Ok(Html(view::login_page(
        &login_session,
        &authorization_url,
        client.client_id(),
    )))
}

/// POST the OAuth callback: the one-time authorization code is the request
/// body, the echoed state token a query parameter.
#[utoipa::path(
    post,
    path = "/gconnect",
    params(ConnectParams),
    request_body = String,
    responses(
        (status = 200, description = "Session connected, or already connected for this subject"),
        (status = 401, description = "State, exchange, subject or audience check failed"),
        (status = 500, description = "Provider returned an unusable response"),
        (status = 502, description = "Provider unreachable")
    )
)]
pub async fn gconnect(
    State(app_state): State<AppState>,
    session: Session,
    Query(params): Query<ConnectParams>,
    code: String,
) -> Result<impl IntoResponse, Error> {
    debug!("POST OAuth callback");

    let login_session: LoginSession = session
        .get(SESSION_KEY)
        .await
        .map_err(session_error)?
        .unwrap_or_default();

    let client = login::google_client(&app_state.config)?;

    match login::connect(
        app_state.db_conn_ref(),
        &client,
        &login_session,
        &params.state,
        &code,
    )
    .await?
    {
        ConnectOutcome::Connected(new_session) => {
            session
                .insert(SESSION_KEY, new_session.as_ref())
                .await
                .map_err(session_error)?;
            Ok(Html(view::welcome_fragment(&new_session)).into_response())
        }
        ConnectOutcome::AlreadyConnected => Ok((
            StatusCode::OK,
            Json(json!("Current user is already connected.")),
        )
            .into_response()),
    }
}

/// GET disconnect: revoke the stored access token and clear the session.
/// On revocation failure the session is left fully intact.
#[utoipa::path(
    get,
    path = "/gdisconnect",
    responses(
        (status = 303, description = "Token revoked, session cleared"),
        (status = 400, description = "Provider refused to revoke the token; session left intact"),
        (status = 401, description = "No connected session")
    )
)]
pub async fn gdisconnect(
    State(app_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let login_session: LoginSession = session
        .get(SESSION_KEY)
        .await
        .map_err(session_error)?
        .unwrap_or_default();

    // A browser with no connected session gets a 401 without contacting the
    // provider at all.
    if login_session.access_token.is_none() {
        return Err(Error(DomainError::oauth(
            domain::error::OAuthErrorKind::NotConnected,
        )));
    }

    let client = login::google_client(&app_state.config)?;

    // Propagating the error here leaves the session untouched.
    login::disconnect(&client, &login_session).await?;

    session.flush().await.map_err(session_error)?;
    info!("User disconnected and session cleared");

    Ok(Redirect::to("/catalog"))
}
