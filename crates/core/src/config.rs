//! Database connection settings sourced from the environment.

use std::fmt;
use std::time::Duration;

use crate::{
    ACQUIRE_TIMEOUT_ENV, ConfigError, DATABASE_URL_ENV, MAX_CONNECTIONS_ENV,
    PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_MAX_CONNECTIONS, env_parse_with_default, env_required,
};

/// Connection settings for the migration pool.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: PG_POOL_MAX_CONNECTIONS,
            acquire_timeout: Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS),
        }
    }

    /// Build from `DATABASE_URL` plus the optional pool tuning variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_url(None)
    }

    /// Like [`Self::from_env`], but an explicit `url` wins over `DATABASE_URL`.
    pub fn from_env_with_url(url: Option<String>) -> Result<Self, ConfigError> {
        let url = match url {
            Some(u) if !u.trim().is_empty() => u,
            Some(_) => return Err(ConfigError::Empty(DATABASE_URL_ENV)),
            None => env_required(DATABASE_URL_ENV)?,
        };
        let max_connections = env_parse_with_default(MAX_CONNECTIONS_ENV, PG_POOL_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                name: MAX_CONNECTIONS_ENV,
                reason: "must be at least 1".to_owned(),
            });
        }
        let acquire_timeout =
            env_parse_with_default(ACQUIRE_TIMEOUT_ENV, PG_POOL_ACQUIRE_TIMEOUT_SECS);
        Ok(Self { url, max_connections, acquire_timeout: Duration::from_secs(acquire_timeout) })
    }

    /// Connection string with any password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((userinfo, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}"),
            None => self.url.clone(),
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout", &self.acquire_timeout)
            .finish()
    }
}
