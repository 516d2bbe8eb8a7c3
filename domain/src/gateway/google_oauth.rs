//! Google OAuth2 HTTP client.
//!
//! This module provides an HTTP client for the four provider endpoints the
//! login flow depends on: authorization-code exchange, access-token
//! introspection (tokeninfo), profile retrieval (userinfo) and token
//! revocation. Every response is treated as JSON text; a missing field is a
//! validation failure, never a panic.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, OAuthErrorKind};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

/// OAuth token response from Google's code-exchange endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Compact JWT carrying the subject claim for the authenticated end user.
    pub id_token: String,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

/// Access-token introspection response from the tokeninfo endpoint.
///
/// All fields are optional on the wire; callers decide which absences are
/// fatal for their check.
#[derive(Debug, Deserialize)]
pub struct TokenInfo {
    /// Subject identifier the token was issued for.
    pub user_id: Option<String>,
    /// The client id the token was issued to.
    pub issued_to: Option<String>,
    pub expires_in: Option<i64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Extended profile info from the userinfo endpoint.
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Request to exchange authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest {
    code: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    grant_type: String,
}

/// Configuration for Google OAuth URLs
#[derive(Debug, Clone)]
pub struct GoogleOAuthUrls {
    pub auth_url: String,
    pub token_url: String,
    pub tokeninfo_url: String,
    pub userinfo_url: String,
    pub revoke_url: String,
}

impl GoogleOAuthUrls {
    pub fn from_config(config: &Config) -> Self {
        Self {
            auth_url: config.google_auth_url().to_string(),
            token_url: config.google_token_url().to_string(),
            tokeninfo_url: config.google_tokeninfo_url().to_string(),
            userinfo_url: config.google_userinfo_url().to_string(),
            revoke_url: config.google_revoke_url().to_string(),
        }
    }
}

/// Google OAuth client for handling authentication
pub struct GoogleOAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    urls: GoogleOAuthUrls,
}

impl GoogleOAuthClient {
    /// Create a new Google OAuth client with configurable URLs
    pub fn new(
        client_id: &str,
        client_secret: &str,
        redirect_uri: &str,
        urls: GoogleOAuthUrls,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            urls,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Generate the OAuth authorization URL for user consent
    pub fn get_authorization_url(&self, state: &str) -> String {
        let scopes = ["openid", "email", "profile"].join(" ");

        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            state={}",
            self.urls.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state)
        )
    }

    /// Exchange authorization code for an access token and identity token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let request = TokenExchangeRequest {
            code: code.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            redirect_uri: self.redirect_uri.clone(),
            grant_type: "authorization_code".to_string(),
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .client
            .post(&self.urls.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Google OAuth code: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            let tokens: TokenResponse = response.json().await.map_err(|e| {
                warn!("Failed to parse Google token response: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::OAuth(OAuthErrorKind::ExchangeFailed),
                }
            })?;
            info!("Successfully exchanged Google OAuth code for tokens");
            Ok(tokens)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google OAuth code exchange error: {}", error_text);
            Err(Error::oauth(OAuthErrorKind::ExchangeFailed))
        }
    }

    /// Introspect an access token against the tokeninfo endpoint.
    ///
    /// An error payload from the provider is surfaced as `ProviderError`; so
    /// is a response that cannot be parsed as a tokeninfo document.
    pub async fn tokeninfo(&self, access_token: &str) -> Result<TokenInfo, Error> {
        debug!("Introspecting Google access token");

        let response = self
            .client
            .get(&self.urls.tokeninfo_url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to introspect Google access token: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        let info: TokenInfo = response.json().await.map_err(|e| {
            warn!("Failed to parse Google tokeninfo response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::OAuth(OAuthErrorKind::ProviderError),
            }
        })?;

        if let Some(error) = &info.error {
            warn!(
                "Google tokeninfo reported an error: {} ({:?})",
                error, info.error_description
            );
            return Err(Error::oauth(OAuthErrorKind::ProviderError));
        }

        Ok(info)
    }

    /// Fetch the extended profile for a validated access token
    pub async fn userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, Error> {
        debug!("Fetching Google user info");

        let response = self
            .client
            .get(&self.urls.userinfo_url)
            .query(&[("access_token", access_token), ("alt", "json")])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to fetch Google user info: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        // A profile document missing name or email is unusable for user
        // resolution and is treated as a provider error.
        let user_info: GoogleUserInfo = response.json().await.map_err(|e| {
            warn!("Failed to parse Google userinfo response: {:?}", e);
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::OAuth(OAuthErrorKind::ProviderError),
            }
        })?;

        Ok(user_info)
    }

    /// Revoke an access token. A response other than 200 means the provider
    /// did not confirm revocation.
    pub async fn revoke(&self, access_token: &str) -> Result<(), Error> {
        debug!("Revoking Google access token");

        let response = self
            .client
            .get(&self.urls.revoke_url)
            .query(&[("token", access_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to revoke Google access token: {:?}", e);
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        if response.status().is_success() {
            info!("Successfully revoked Google access token");
            Ok(())
        } else {
            warn!(
                "Google token revocation returned status {}",
                response.status()
            );
            Err(Error::oauth(OAuthErrorKind::RevocationFailed))
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

/// Extract the subject claim from a compact identity token without verifying
/// its signature. Validity is established by cross-checking the subject
/// against the tokeninfo introspection result, not by signature verification.
pub fn id_token_subject(id_token: &str) -> Result<String, Error> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| Error::oauth(OAuthErrorKind::ExchangeFailed))?;

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: DomainErrorKind::OAuth(OAuthErrorKind::ExchangeFailed),
        })?;

    let claims: IdTokenClaims = serde_json::from_slice(&decoded).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: DomainErrorKind::OAuth(OAuthErrorKind::ExchangeFailed),
    })?;

    Ok(claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn test_client(server_url: &str) -> GoogleOAuthClient {
        let urls = GoogleOAuthUrls {
            auth_url: format!("{server_url}/o/oauth2/v2/auth"),
            token_url: format!("{server_url}/token"),
            tokeninfo_url: format!("{server_url}/tokeninfo"),
            userinfo_url: format!("{server_url}/userinfo"),
            revoke_url: format!("{server_url}/revoke"),
        };
        GoogleOAuthClient::new("test-client-id", "test-secret", "postmessage", urls).unwrap()
    }

    pub(crate) fn fake_id_token(sub: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"sub":"{sub}","aud":"test-client-id","iss":"accounts.google.com"}}"#
        ));
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn id_token_subject_extracts_the_sub_claim() {
        let token = fake_id_token("1085234");
        assert_eq!(id_token_subject(&token).unwrap(), "1085234");
    }

    #[test]
    fn id_token_subject_rejects_a_malformed_token() {
        let result = id_token_subject("not-a-jwt");
        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::OAuth(OAuthErrorKind::ExchangeFailed)
        );
    }

    #[test]
    fn authorization_url_carries_client_id_and_state() {
        let client = test_client("https://accounts.example.com");
        let url = client.get_authorization_url("STATE123");

        assert!(url.starts_with("https://accounts.example.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("state=STATE123"));
    }

    #[tokio::test]
    async fn exchange_code_returns_tokens_on_success() {
        let mut server = Server::new_async().await;
        let id_token = fake_id_token("12345");
        let body = format!(
            r#"{{"access_token":"ya29.token","id_token":"{id_token}","expires_in":3599,"token_type":"Bearer"}}"#
        );
        let mock = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let tokens = client.exchange_code("auth-code").await.unwrap();

        assert_eq!(tokens.access_token, "ya29.token");
        assert_eq!(tokens.token_type, "Bearer");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exchange_code_maps_provider_rejection_to_exchange_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.exchange_code("expired-code").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::OAuth(OAuthErrorKind::ExchangeFailed)
        );
    }

    #[tokio::test]
    async fn tokeninfo_error_payload_is_a_provider_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/tokeninfo.*".to_string()))
            .with_status(400)
            .with_body(r#"{"error":"invalid_token"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.tokeninfo("bad-token").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::OAuth(OAuthErrorKind::ProviderError)
        );
    }

    #[tokio::test]
    async fn revoke_non_200_is_revocation_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Regex("^/revoke.*".to_string()))
            .with_status(400)
            .with_body(r#"{"error":"invalid_token"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let result = client.revoke("stale-token").await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::OAuth(OAuthErrorKind::RevocationFailed)
        );
    }
}
