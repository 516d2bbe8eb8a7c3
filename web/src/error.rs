use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
    OAuthErrorKind,
};

extern crate log;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(pub(crate) DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        error_response(StatusCode::NOT_FOUND, "NOT FOUND")
                    }
                    EntityErrorKind::Invalid => {
                        error_response(StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY")
                    }
                    EntityErrorKind::Unauthorized => {
                        error_response(StatusCode::FORBIDDEN, "NOT AUTHORIZED")
                    }
                    EntityErrorKind::Other(_) => {
                        error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                    }
                },
                InternalErrorKind::Config => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                }
                InternalErrorKind::Other(_) => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network => error_response(StatusCode::BAD_GATEWAY, "BAD GATEWAY"),
                ExternalErrorKind::Other(_) => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                }
            },
            DomainErrorKind::OAuth(oauth_error_kind) => match oauth_error_kind {
                OAuthErrorKind::InvalidState => {
                    error_response(StatusCode::UNAUTHORIZED, "Invalid state parameter")
                }
                OAuthErrorKind::ExchangeFailed => {
                    error_response(StatusCode::UNAUTHORIZED, "Failed to upgrade the authorization code")
                }
                OAuthErrorKind::SubjectMismatch => {
                    error_response(StatusCode::UNAUTHORIZED, "Token's user ID doesn't match given user ID")
                }
                OAuthErrorKind::AudienceMismatch => {
                    error_response(StatusCode::UNAUTHORIZED, "Token's client ID does not match app's")
                }
                OAuthErrorKind::NotConnected => {
                    error_response(StatusCode::UNAUTHORIZED, "Current user not connected")
                }
                OAuthErrorKind::RevocationFailed => {
                    error_response(StatusCode::BAD_REQUEST, "Failed to revoke token for given user")
                }
                OAuthErrorKind::ProviderError => {
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR")
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::Error as DomainError;

    #[test]
    fn not_found_maps_to_404() {
        let response =
            Error(DomainError::entity(EntityErrorKind::NotFound)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn ownership_violations_map_to_403() {
        let response =
            Error(DomainError::entity(EntityErrorKind::Unauthorized)).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn oauth_rejections_map_to_401_and_revocation_failure_to_400() {
        for kind in [
            OAuthErrorKind::InvalidState,
            OAuthErrorKind::ExchangeFailed,
            OAuthErrorKind::SubjectMismatch,
            OAuthErrorKind::AudienceMismatch,
            OAuthErrorKind::NotConnected,
        ] {
            let response = Error(DomainError::oauth(kind)).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        let response = Error(DomainError::oauth(OAuthErrorKind::RevocationFailed)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
