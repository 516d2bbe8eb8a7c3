pub(crate) mod authenticated_user;
pub(crate) mod current_session;

use axum::http::StatusCode;

type RejectionType = (StatusCode, String);
