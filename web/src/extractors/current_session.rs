use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use domain::session::{LoginSession, SESSION_KEY};
use log::*;
use tower_sessions::Session;

/// Extracts whatever login session exists for this browser, authenticated or
/// not. Public pages use this to choose between their public and private
/// renderings; a missing session yields the default (anonymous) state.
pub(crate) struct CurrentSession(pub LoginSession);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
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

        Ok(CurrentSession(login_session))
    }
}
