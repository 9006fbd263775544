//! Client configuration parsed from environment variables.

use std::time::Duration;

use leads::EmailPolicy;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_SUBMISSION_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server origin without a trailing slash.
    pub base_url: String,
    pub submission_timeout: Duration,
    /// Bearer token sent on admin requests.
    pub admin_token: Option<String>,
    /// Policy for the pre-flight validation run before any network call.
    pub email_policy: EmailPolicy,
}

impl ClientConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `CHAITRADE_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `CHAITRADE_SUBMISSION_TIMEOUT_MS`: default 10000
    /// - `CHAITRADE_ADMIN_TOKEN`
    /// - `CHAITRADE_EMAIL_POLICY`: `strict` (default) or `lenient`
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
    /// Returns an error if a value is present but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let base_url = get("CHAITRADE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "CHAITRADE_BASE_URL",
                reason: format!("'{base_url}' must start with http:// or https://"),
            });
        }

        let timeout_ms = match get("CHAITRADE_SUBMISSION_TIMEOUT_MS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|ms| *ms > 0).ok_or_else(|| ConfigError::Invalid {
                key: "CHAITRADE_SUBMISSION_TIMEOUT_MS",
                reason: format!("'{raw}' is not a positive number of milliseconds"),
            })?,
            None => DEFAULT_SUBMISSION_TIMEOUT_MS,
        };

        let email_policy = match get("CHAITRADE_EMAIL_POLICY") {
            Some(raw) => raw
                .parse::<EmailPolicy>()
                .map_err(|reason| ConfigError::Invalid { key: "CHAITRADE_EMAIL_POLICY", reason })?,
            None => EmailPolicy::default(),
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            submission_timeout: Duration::from_millis(timeout_ms),
            admin_token: get("CHAITRADE_ADMIN_TOKEN"),
            email_policy,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            submission_timeout: Duration::from_millis(DEFAULT_SUBMISSION_TIMEOUT_MS),
            admin_token: None,
            email_policy: EmailPolicy::default(),
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("submission_timeout", &self.submission_timeout)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "<redacted>"))
            .field("email_policy", &self.email_policy)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
