use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Default Google OAuth2 endpoint URLs. Each endpoint can be overridden
/// individually (primarily so that tests can point them at a mock server).
pub const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_GOOGLE_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
pub const DEFAULT_GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/userinfo";
pub const DEFAULT_GOOGLE_REVOKE_URL: &str = "https://accounts.google.com/o/oauth2/revoke";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// The registered OAuth2 client identity, as downloaded from the Google API
/// console (`client_secrets.json`). Only the fields this application reads
/// are modeled.
#[derive(Clone, Debug, Deserialize)]
pub struct ClientSecrets {
    pub web: ClientIdentity,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClientIdentity {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Debug)]
pub struct ClientSecretsError(pub String);

impl fmt::Display for ClientSecretsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Client secrets error: {}", self.0)
    }
}

impl std::error::Error for ClientSecretsError {}

impl ClientSecrets {
    /// Reads and parses a Google-format client identity file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientSecretsError> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            ClientSecretsError(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        serde_json::from_str(&contents)
            .map_err(|e| ClientSecretsError(format!("failed to parse client secrets: {e}")))
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:8000,https://localhost:8000"
    )]
    pub allowed_origins: Vec<String>,

    /// Sets the database URL to connect to; a file-backed SQLite store by default
    #[arg(short, long, env, default_value = "sqlite://./catalog.db?mode=rwc")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool
    #[arg(long, env, default_value_t = 10)]
    pub db_max_connections: u32,

    /// Minimum number of idle database connections to maintain
    #[arg(long, env, default_value_t = 1)]
    pub db_min_connections: u32,

    /// Timeout in seconds for establishing a new database connection
    #[arg(long, env, default_value_t = 8)]
    pub db_connect_timeout_secs: u64,

    /// Timeout in seconds for acquiring a connection from the pool
    #[arg(long, env, default_value_t = 8)]
    pub db_acquire_timeout_secs: u64,

    /// Path to the Google client identity file (client_secrets.json format)
    #[arg(long, env, default_value = "client_secrets.json")]
    client_secrets_file: String,

    /// Google OAuth2 authorization endpoint
    #[arg(long, env, default_value = DEFAULT_GOOGLE_AUTH_URL)]
    google_auth_url: String,

    /// Google OAuth2 code-exchange (token) endpoint
    #[arg(long, env, default_value = DEFAULT_GOOGLE_TOKEN_URL)]
    google_token_url: String,

    /// Google OAuth2 token introspection endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_TOKENINFO_URL)]
    google_tokeninfo_url: String,

    /// Google OAuth2 profile endpoint
    #[arg(long, env, default_value = DEFAULT_GOOGLE_USERINFO_URL)]
    google_userinfo_url: String,

    /// Google OAuth2 token revocation endpoint
    #[arg(long, env, default_value = DEFAULT_GOOGLE_REVOKE_URL)]
    google_revoke_url: String,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    /// Session expiry duration in seconds (default: 24 hours = 86400 seconds)
    #[arg(long, env, default_value_t = 86400)]
    pub session_expiry_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        // Parse from an empty command line so tests and library callers get
        // the declared defaults without reading process arguments.
        Config::parse_from(["catalog_rs"])
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn set_database_url(mut self, database_url: String) -> Self {
        self.database_url = Some(database_url);
        self
    }

    pub fn set_client_secrets_file(mut self, client_secrets_file: String) -> Self {
        self.client_secrets_file = client_secrets_file;
        self
    }

    pub fn set_google_token_url(mut self, google_token_url: String) -> Self {
        self.google_token_url = google_token_url;
        self
    }

    pub fn set_google_tokeninfo_url(mut self, google_tokeninfo_url: String) -> Self {
        self.google_tokeninfo_url = google_tokeninfo_url;
        self
    }

    pub fn database_url(&self) -> &str {
        self.database_url
            .as_ref()
            .expect("No Database URL provided")
    }

    /// Loads the registered client identity from the configured secrets file.
    pub fn client_secrets(&self) -> Result<ClientSecrets, ClientSecretsError> {
        ClientSecrets::from_file(&self.client_secrets_file)
    }

    pub fn google_auth_url(&self) -> &str {
        &self.google_auth_url
    }

    pub fn google_token_url(&self) -> &str {
        &self.google_token_url
    }

    pub fn google_tokeninfo_url(&self) -> &str {
        &self.google_tokeninfo_url
    }

    pub fn google_userinfo_url(&self) -> &str {
        &self.google_userinfo_url
    }

    pub fn google_revoke_url(&self) -> &str {
        &self.google_revoke_url
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_google_format_client_secrets_file() {
        let contents = r#"{
            "web": {
                "client_id": "1234.apps.googleusercontent.com",
                "client_secret": "shhh",
                "redirect_uris": ["http://localhost:8000/gconnect"],
                "auth_uri": "https://accounts.google.com/o/oauth2/auth"
            }
        }"#;

        let secrets: ClientSecrets = serde_json::from_str(contents).unwrap();
        assert_eq!(secrets.web.client_id, "1234.apps.googleusercontent.com");
        assert_eq!(secrets.web.client_secret, "shhh");
        assert_eq!(
            secrets.web.redirect_uris,
            vec!["http://localhost:8000/gconnect"]
        );
    }

    #[test]
    fn missing_client_secrets_file_is_a_structured_error() {
        let result = ClientSecrets::from_file("/definitely/not/here.json");
        assert!(result.is_err());
    }
}
