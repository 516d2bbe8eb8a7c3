//! Explicit per-browser login session state.
//!
//! The original design threaded OAuth state through an ambient,
//! framework-provided session map. Here the same state is an explicit struct
//! with defined fields: the web layer stores and retrieves it whole, and the
//! login reconciler returns new values rather than mutating shared state.

use crate::Id;
use serde::{Deserialize, Serialize};

/// Key under which the [`LoginSession`] is stored in the session store.
pub const SESSION_KEY: &str = "login_session";

/// Everything the server remembers about one browser session.
///
/// Lifecycle: created (with only a state token) when the login page is
/// rendered, completed by a successful connect, and cleared on disconnect.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginSession {
    /// Anti-forgery token issued at login-page render, echoed back by the
    /// OAuth callback.
    pub state_token: Option<String>,
    /// Access token obtained from the provider; present only while connected.
    pub access_token: Option<String>,
    /// Provider-assigned subject identifier for the authenticated end user.
    pub google_id: Option<String>,
    /// Cached display name from the provider profile.
    pub username: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    /// The resolved local user id; the authorization identity for catalog
    /// mutations.
    pub user_id: Option<Id>,
}

impl LoginSession {
    /// A session that has issued a state token but not yet connected.
    pub fn with_state_token(state_token: String) -> Self {
        Self {
            state_token: Some(state_token),
            ..Self::default()
        }
    }

    /// True once a local user id has been bound by a successful connect.
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// True if this session already holds credentials for the given subject.
    /// Used to make repeated connect calls idempotent within one session.
    pub fn is_connected_as(&self, subject: &str) -> bool {
        self.access_token.is_some() && self.google_id.as_deref() == Some(subject)
    }
}
