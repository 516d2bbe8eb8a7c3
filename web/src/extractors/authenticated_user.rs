use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use domain::session::{LoginSession, SESSION_KEY};
use log::*;
use tower_sessions::Session;

/// Extracts the login session for a browser session that has completed the
/// OAuth connect flow. Rejects with 401 when no local user id is bound.
pub(crate) struct AuthenticatedUser(pub LoginSession);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| (status, msg.to_string()))?;

        let login_session: LoginSession = session
            .get(SESSION_KEY)
            .await
            .map_err(|err| {
                warn!("Failed to load login session from the session store: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL SERVER ERROR".to_string(),
                )
            })?
            .unwrap_or_default();

        if login_session.is_authenticated() {
            Ok(AuthenticatedUser(login_session))
        } else {
            Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))
        }
    }
}
