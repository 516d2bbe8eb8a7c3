//! The login / session-reconciliation flow.
//!
//! Turns a one-time external authorization grant into a trusted local session
//! bound to a local user record, while rejecting forged or mismatched
//! requests. The flow is a straight line of checks; every rejection is
//! terminal for the request and leaves stored session state untouched.
//!
//! Order of operations for [`connect`]:
//! 1. the echoed anti-forgery state token must equal the issued one
//!    (checked before any network call is made)
//! 2. the authorization code is exchanged for credentials
//! 3. the access token is introspected against the provider
//! 4. the identity token's subject must equal the introspected subject, and
//!    the introspected audience must equal this application's client id
//! 5. a repeated connect for the same subject short-circuits idempotently
//! 6. the extended profile is fetched and the local user is upserted by email

use crate::error::{Error, OAuthErrorKind};
use crate::gateway::google_oauth::{id_token_subject, GoogleOAuthClient, GoogleOAuthUrls};
use crate::session::LoginSession;
use crate::users;
use entity_api::user;
use log::*;
use rand::Rng;
use sea_orm::DatabaseConnection;
use service::config::Config;

const STATE_TOKEN_LEN: usize = 32;
const STATE_TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a fresh anti-forgery state token: 32 characters drawn uniformly
/// from upper-case letters and digits.
pub fn generate_state_token() -> String {
    let mut rng = rand::thread_rng();
    (0..STATE_TOKEN_LEN)
        .map(|_| STATE_TOKEN_ALPHABET[rng.gen_range(0..STATE_TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// Builds the OAuth client for the registered application identity.
///
/// The redirect URI is the literal `postmessage` because the login page uses
/// the provider's sign-in widget, which posts the one-time code back to
/// `/gconnect` rather than redirecting the browser.
pub fn google_client(config: &Config) -> Result<GoogleOAuthClient, Error> {
    let secrets = config.client_secrets()?;
    GoogleOAuthClient::new(
        &secrets.web.client_id,
        &secrets.web.client_secret,
        "postmessage",
        GoogleOAuthUrls::from_config(config),
    )
}

/// Terminal success states of the connect flow.
#[derive(Debug)]
pub enum ConnectOutcome {
    /// A new identity was verified and bound; the returned session replaces
    /// the stored one wholesale.
    Connected(Box<LoginSession>),
    /// The session already held credentials for this subject; nothing was
    /// mutated and no profile fetch was made.
    AlreadyConnected,
}

/// Run the full reconciliation for an OAuth callback.
///
/// `session` is the state stored for this browser session; it is read, never
/// mutated. On success the caller persists the returned session.
pub async fn connect(
    db: &DatabaseConnection,
    client: &GoogleOAuthClient,
    session: &LoginSession,
    echoed_state: &str,
    authorization_code: &str,
) -> Result<ConnectOutcome, Error> {
    // Anti-forgery check first; a forged callback never reaches the provider.
    if session.state_token.as_deref() != Some(echoed_state) {
        warn!("OAuth callback with invalid state token");
        return Err(Error::oauth(OAuthErrorKind::InvalidState));
    }

    let tokens = client.exchange_code(authorization_code).await?;
    let subject = id_token_subject(&tokens.id_token)?;

    let info = client.tokeninfo(&tokens.access_token).await?;
    let introspected_subject = info
        .user_id
        .ok_or_else(|| Error::oauth(OAuthErrorKind::ProviderError))?;
    let issued_to = info
        .issued_to
        .ok_or_else(|| Error::oauth(OAuthErrorKind::ProviderError))?;

    if introspected_subject != subject {
        warn!("Access token subject does not match identity token subject");
        return Err(Error::oauth(OAuthErrorKind::SubjectMismatch));
    }

    if issued_to != client.client_id() {
        warn!("Access token was not issued to this application's client id");
        return Err(Error::oauth(OAuthErrorKind::AudienceMismatch));
    }

    if session.is_connected_as(&subject) {
        debug!("Current user is already connected");
        return Ok(ConnectOutcome::AlreadyConnected);
    }

    let profile = client.userinfo(&tokens.access_token).await?;

    // Idempotent by email: the same verified identity always resolves to the
    // same local user row.
    let local_user = user::find_or_create_by_email(
        db,
        users::Model {
            id: crate::Id::new_v4(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            picture: profile.picture.clone(),
            created_at: chrono::Utc::now().into(),
            updated_at: chrono::Utc::now().into(),
        },
    )
    .await?;

    info!("User {} connected via Google OAuth", local_user.id);

    Ok(ConnectOutcome::Connected(Box::new(LoginSession {
        state_token: session.state_token.clone(),
        access_token: Some(tokens.access_token),
        google_id: Some(subject),
        username: Some(profile.name),
        email: Some(profile.email),
        picture: profile.picture,
        user_id: Some(local_user.id),
    })))
}

/// Revoke the stored access token with the provider.
///
/// Succeeds only when the provider confirms revocation; on any failure the
/// caller must leave the stored session intact (disconnect is explicitly not
/// idempotent on failure).
pub async fn disconnect(client: &GoogleOAuthClient, session: &LoginSession) -> Result<(), Error> {
    let access_token = session
        .access_token
        .as_deref()
        .ok_or_else(|| Error::oauth(OAuthErrorKind::NotConnected))?;

    client.revoke(access_token).await
}
