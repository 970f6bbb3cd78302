//! Configuration loaded once at startup
//!
//! Nothing here reads the environment lazily: `main` builds the structs and
//! hands them to the provider and layer. Loading goes through a lookup
//! function so tests never have to mutate the process environment.

use crate::{Error, Result};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use url::Url;

pub const DATABASE_URL_VARIABLE: &str = "DATABASE_URL";
pub const HOST_VARIABLE: &str = "DB_HOST";
pub const PORT_VARIABLE: &str = "DB_PORT";
pub const DATABASE_NAME_VARIABLE: &str = "DB_NAME";
pub const USER_VARIABLE: &str = "DB_USER";
pub const PASSWORD_VARIABLE: &str = "DB_PASSWORD";
pub const REQUIRE_TLS_VARIABLE: &str = "DB_REQUIRE_TLS";

pub const BIND_ADDRESS_VARIABLE: &str = "VIEWER_BIND_ADDRESS";
pub const BASE_PATH_VARIABLE: &str = "VIEWER_BASE_PATH";
pub const TITLE_VARIABLE: &str = "VIEWER_TITLE";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_BASE_PATH: &str = "/";
const DEFAULT_TITLE: &str = "Company Asset Viewer";

/// Where the database lives and how to log in
#[derive(Clone, PartialEq, Eq)]
pub enum ConnectionConfig {
    /// A complete connection URI
    Url(String),

    /// Discrete credential fields; empty strings mean "not provided"
    Discrete {
        host: String,
        port: Option<u16>,
        database: String,
        user: String,
        password: String,
    },
}

impl ConnectionConfig {
    /// Names of the required settings that are empty
    pub fn missing_fields(&self) -> Vec<String> {
        match self {
            ConnectionConfig::Url(url) => {
                if url.trim().is_empty() {
                    vec![DATABASE_URL_VARIABLE.to_string()]
                } else {
                    Vec::new()
                }
            }
            ConnectionConfig::Discrete {
                host,
                database,
                user,
                password,
                ..
            } => [
                (HOST_VARIABLE, host),
                (DATABASE_NAME_VARIABLE, database),
                (USER_VARIABLE, user),
                (PASSWORD_VARIABLE, password),
            ]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name.to_string())
            .collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionConfig::Url(_) => formatter.write_str("Url(<redacted>)"),
            ConnectionConfig::Discrete {
                host,
                port,
                database,
                user,
                ..
            } => formatter
                .debug_struct("Discrete")
                .field("host", host)
                .field("port", port)
                .field("database", database)
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// Database settings handed to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub connection: ConnectionConfig,

    /// Force `sslmode=require`
    pub require_encryption: bool,
}

impl DatabaseConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup
    ///
    /// A non-empty `DATABASE_URL` takes precedence over the discrete
    /// variables. Missing values are kept empty and surface later as a
    /// warning; only a malformed `DB_PORT` is an error here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require_encryption = lookup(REQUIRE_TLS_VARIABLE)
            .map(|value| !is_disabled(&value))
            .unwrap_or(true);

        let url = lookup(DATABASE_URL_VARIABLE).filter(|value| !value.trim().is_empty());
        if let Some(url) = url {
            return Ok(Self {
                connection: ConnectionConfig::Url(url),
                require_encryption,
            });
        }

        let field = |name: &str| lookup(name).unwrap_or_default();
        let port = match lookup(PORT_VARIABLE).filter(|value| !value.trim().is_empty()) {
            Some(value) => Some(value.trim().parse::<u16>().map_err(|_| {
                Error::Configuration(format!("{} is not a valid port: {}", PORT_VARIABLE, value))
            })?),
            None => None,
        };

        Ok(Self {
            connection: ConnectionConfig::Discrete {
                host: field(HOST_VARIABLE),
                port,
                database: field(DATABASE_NAME_VARIABLE),
                user: field(USER_VARIABLE),
                password: field(PASSWORD_VARIABLE),
            },
            require_encryption,
        })
    }

    /// The URI actually handed to the driver, for the URI form only
    ///
    /// `sslmode=require` is appended when encryption is required and the URI
    /// has no `sslmode` query parameter. A URI that does not parse is passed
    /// through so the driver reports the problem.
    pub fn connection_url(&self) -> Option<String> {
        match &self.connection {
            ConnectionConfig::Url(raw) => {
                if !self.require_encryption {
                    return Some(raw.clone());
                }
                let Ok(mut parsed) = Url::parse(raw) else {
                    return Some(raw.clone());
                };
                if parsed.query_pairs().any(|(key, _)| key == "sslmode") {
                    return Some(raw.clone());
                }
                parsed.query_pairs_mut().append_pair("sslmode", "require");
                Some(parsed.into())
            }
            ConnectionConfig::Discrete { .. } => None,
        }
    }

    /// Driver options for a single connection attempt
    pub fn connect_options(&self) -> std::result::Result<PgConnectOptions, sqlx::Error> {
        match &self.connection {
            ConnectionConfig::Url(_) => {
                let url = self.connection_url().unwrap_or_default();
                PgConnectOptions::from_str(&url)
            }
            ConnectionConfig::Discrete {
                host,
                port,
                database,
                user,
                password,
            } => {
                let mut options = PgConnectOptions::new()
                    .host(host)
                    .database(database)
                    .username(user)
                    .password(password);
                if let Some(port) = port {
                    options = options.port(*port);
                }
                if self.require_encryption {
                    options = options.ssl_mode(PgSslMode::Require);
                }
                Ok(options)
            }
        }
    }
}

/// Settings of the HTTP surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub bind_address: SocketAddr,

    /// Path prefix the page is mounted at
    pub base_path: String,

    /// Heading shown on every page
    pub title: String,
}

impl ViewerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let address = lookup(BIND_ADDRESS_VARIABLE)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = address.trim().parse::<SocketAddr>().map_err(|_| {
            Error::Configuration(format!(
                "{} is not a valid socket address: {}",
                BIND_ADDRESS_VARIABLE, address
            ))
        })?;

        let base_path = lookup(BASE_PATH_VARIABLE)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string());

        let title = lookup(TITLE_VARIABLE)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());

        Ok(Self {
            bind_address,
            base_path: normalize_base_path(&base_path),
            title,
        })
    }
}

/// Normalise a mount path to `""` (root) or `/segment` without trailing slash
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn is_disabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off"
    )
}
