use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use domain::session::{LoginSession, SESSION_KEY};
use log::*;
use tower_sessions::Session;

/// Authentication middleware for the catalog mutation pages.
///
/// Unauthenticated requests are redirected to the login page rather than
/// rejected outright, matching the browser-facing nature of these routes.
pub async fn require_auth(session: Session, request: Request, next: Next) -> Response {
    let login_session: LoginSession = match session.get(SESSION_KEY).await {
        Ok(login_session) => login_session.unwrap_or_default(),
        Err(err) => {
            warn!("Failed to load login session from the session store: {err:?}");
            LoginSession::default()
        }
    };

    if login_session.is_authenticated() {
        next.run(request).await
    } else {
        Redirect::to("/login").into_response()
    }
}
