use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters echoed back by the OAuth callback.
#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct ConnectParams {
    pub(crate) state: String,
}
