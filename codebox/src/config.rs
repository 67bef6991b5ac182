//! Service configuration.
//!
//! A `Config` is assembled by figment from three layers, each overriding the one before:
//!
//! 1. the YAML file named by `-f` / `CODEBOX_CONFIG` (`config.yaml` when unset; a missing file is
//!    fine, every key has a default)
//! 2. `CODEBOX_*` environment variables, with `__` separating nested keys
//!    (`CODEBOX_COMMUNITY__MAX_PAGE_SIZE=50`)
//! 3. a plain `DATABASE_URL`, which wins over `database.url`
//!
//! ```bash
//! DATABASE_URL="postgresql://codebox:secret@db/codebox" \
//! CODEBOX_PORT=8080 \
//! CODEBOX_AUTH__PROXY_HEADER__EMAIL_HEADER_NAME=x-forwarded-email \
//!   codebox -f /etc/codebox/config.yaml
//! ```
//!
//! [`Config::load`] runs [`Config::validate`] before returning, so `codebox --validate` is enough
//! to check a deployment's settings.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::api::models::pagination::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::errors::Error;

/// Command line: where the config file lives, and whether to only check it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// YAML file to load
    #[arg(short = 'f', long, env = "CODEBOX_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Load and validate the configuration, print the result and exit
    #[arg(long)]
    pub validate: bool,
}

/// Top-level configuration. An empty YAML document yields [`Config::default`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Shorthand for `database.url`, usually populated from `DATABASE_URL`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Authentication and CORS configuration
    pub auth: AuthConfig,
    /// Community forum settings
    pub community: CommunityConfig,
    /// Serve HTTP request metrics at `/internal/metrics`
    pub enable_metrics: bool,
    /// Export spans over OTLP (see [`crate::telemetry`])
    pub enable_otel_export: bool,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string for the database
    pub url: String,
    /// Connection pool settings
    pub pool: PoolSettings,
}

/// Connection pool configuration with the SQLx parameters we expose.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    pub max_connections: u32,
    /// Connections kept open while idle
    pub min_connections: u32,
    /// How long a handler waits for a free connection before failing
    pub acquire_timeout_secs: u64,
    /// Close connections idle for longer than this; 0 keeps them
    pub idle_timeout_secs: u64,
    /// Recycle connections older than this; 0 keeps them
    pub max_lifetime_secs: u64,
}

impl PoolSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    pub fn max_lifetime(&self) -> Option<Duration> {
        (self.max_lifetime_secs > 0).then(|| Duration::from_secs(self.max_lifetime_secs))
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Proxy header-based authentication
    pub proxy_header: ProxyHeaderAuthConfig,
    /// Browser access from the web client
    pub cors: CorsConfig,
}

/// Names of the identity headers set by the authenticating proxy.
///
/// The identity provider runs in front of this service and forwards the verified identity
/// as HTTP headers. Requests without the user header are treated as anonymous.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProxyHeaderAuthConfig {
    /// Enable proxy header authentication. When disabled every request is anonymous.
    pub enabled: bool,
    /// HTTP header carrying the provider-issued user id
    pub header_name: String,
    /// HTTP header carrying the verified email address
    pub email_header_name: String,
    /// HTTP header carrying the user's full display name (optional per request)
    pub name_header_name: String,
    /// HTTP header carrying the user's first name (optional per request)
    pub first_name_header_name: String,
}

/// CORS settings for the web client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Origins the web client is served from; `*` allows any
    pub allowed_origins: Vec<CorsOrigin>,
    /// Send `Access-Control-Allow-Credentials: true`; not allowed together with `*`
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds
    pub max_age: Option<u64>,
    /// Response headers readable by the client beyond the safelisted ones
    pub exposed_headers: Vec<String>,
}

/// One allowed origin: the literal `*` or an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum CorsOrigin {
    Wildcard,
    Url(Url),
}

impl TryFrom<String> for CorsOrigin {
    type Error = url::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim() {
            "*" => Ok(CorsOrigin::Wildcard),
            origin => Url::parse(origin).map(CorsOrigin::Url),
        }
    }
}

impl From<CorsOrigin> for String {
    fn from(origin: CorsOrigin) -> Self {
        match origin {
            CorsOrigin::Wildcard => "*".to_string(),
            CorsOrigin::Url(url) => url.to_string(),
        }
    }
}

/// Community forum configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommunityConfig {
    /// Number of posts returned when the client does not pass `limit`
    pub default_page_size: i64,
    /// Upper bound applied to client-supplied `limit`
    pub max_page_size: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_url: None,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            community: CommunityConfig::default(),
            enable_metrics: false,
            enable_otel_export: false,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/codebox".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
        }
    }
}

impl Default for ProxyHeaderAuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            header_name: "x-codebox-user".to_string(),
            email_header_name: "x-codebox-email".to_string(),
            name_header_name: "x-codebox-name".to_string(),
            first_name_header_name: "x-codebox-first-name".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            allow_credentials: false,
            max_age: Some(3600),
            exposed_headers: vec![],
        }
    }
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_LIMIT,
            max_page_size: MAX_LIMIT,
        }
    }
}

fn invalid(reason: impl Into<String>) -> Error {
    Error::Internal {
        operation: format!("validate configuration: {}", reason.into()),
    }
}

impl Config {
    /// Load, merge and validate the configuration described in the module docs.
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL lands in `database_url`; fold it into the nested setting
        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let pool = &self.database.pool;
        let proxy = &self.auth.proxy_header;
        let cors = &self.auth.cors;
        let community = &self.community;

        if self.database.url.trim().is_empty() {
            return Err(invalid("database.url is empty; set it or DATABASE_URL"));
        }
        if pool.max_connections == 0 {
            return Err(invalid("database.pool.max_connections must be at least 1"));
        }
        if pool.min_connections > pool.max_connections {
            return Err(invalid(format!(
                "database.pool.min_connections ({}) exceeds max_connections ({})",
                pool.min_connections, pool.max_connections
            )));
        }

        if proxy.enabled && (proxy.header_name.trim().is_empty() || proxy.email_header_name.trim().is_empty()) {
            return Err(invalid("auth.proxy_header needs header_name and email_header_name when enabled"));
        }

        if cors.allowed_origins.is_empty() {
            return Err(invalid("auth.cors.allowed_origins needs at least one origin"));
        }
        if cors.allow_credentials && cors.allowed_origins.contains(&CorsOrigin::Wildcard) {
            return Err(invalid("auth.cors cannot combine the wildcard origin with allow_credentials"));
        }

        if community.max_page_size < 1 {
            return Err(invalid("community.max_page_size must be at least 1"));
        }
        if !(1..=community.max_page_size).contains(&community.default_page_size) {
            return Err(invalid(format!(
                "community.default_page_size ({}) must lie in 1..={}",
                community.default_page_size, community.max_page_size
            )));
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            .merge(Yaml::file(&args.config))
            // CODEBOX_CONFIG names the file itself, not a key
            .merge(Env::prefixed("CODEBOX_").ignore(&["config"]).split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
