//! Server configuration parsed from environment variables.
//!
//! `ServerConfig::from_env` is the production entry point; tests go through
//! `from_lookup` with a map so they never touch process-global env state.

use std::fmt;
use std::str::FromStr;

use leads::EmailPolicy;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Bounds applied to `pageSize` on list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl PageLimits {
    /// Resolve a requested page size: absent → default, otherwise clamped to
    /// `1..=max_size`.
    #[must_use]
    pub fn resolve(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_size).clamp(1, self.max_size)
    }
}

impl Default for PageLimits {
    fn default() -> Self {
        Self { default_size: DEFAULT_PAGE_SIZE, max_size: DEFAULT_MAX_PAGE_SIZE }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Bearer token guarding the admin endpoints. `None` leaves them open.
    pub admin_token: Option<String>,
    pub email_policy: EmailPolicy,
    pub page_limits: PageLimits,
}

impl ServerConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DATABASE_URL`: Postgres URL; in-memory store when absent
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `ADMIN_TOKEN`: bearer token for admin routes
    /// - `EMAIL_POLICY`: `strict` (default) or `lenient`
    /// - `LIST_DEFAULT_PAGE_SIZE`: default 50
    /// - `LIST_MAX_PAGE_SIZE`: default 200
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is present but cannot be parsed, or the
    /// page limits are inconsistent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let port = parse_or(get("PORT"), "PORT", DEFAULT_PORT)?;
        let db_max_connections = parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?;
        let email_policy = match get("EMAIL_POLICY") {
            Some(raw) => raw
                .parse::<EmailPolicy>()
                .map_err(|reason| ConfigError::Invalid { key: "EMAIL_POLICY", reason })?,
            None => EmailPolicy::default(),
        };

        let max_size = parse_or(get("LIST_MAX_PAGE_SIZE"), "LIST_MAX_PAGE_SIZE", DEFAULT_MAX_PAGE_SIZE)?;
        if max_size == 0 {
            return Err(ConfigError::Invalid { key: "LIST_MAX_PAGE_SIZE", reason: "must be at least 1".into() });
        }
        let default_size = parse_or(get("LIST_DEFAULT_PAGE_SIZE"), "LIST_DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if default_size == 0 || default_size > max_size {
            return Err(ConfigError::Invalid {
                key: "LIST_DEFAULT_PAGE_SIZE",
                reason: format!("must be between 1 and {max_size}"),
            });
        }

        Ok(Self {
            port,
            database_url: get("DATABASE_URL"),
            db_max_connections,
            admin_token: get("ADMIN_TOKEN"),
            email_policy,
            page_limits: PageLimits { default_size, max_size },
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            admin_token: None,
            email_policy: EmailPolicy::default(),
            page_limits: PageLimits::default(),
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database", &self.database_url.as_ref().map(|_| "<configured>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field("email_policy", &self.email_policy)
            .field("page_limits", &self.page_limits)
            .finish()
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| ConfigError::Invalid { key, reason: format!("'{value}': {e}") }),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
