//! Server configuration.
//!
//! `ServerConfig` combines everything the process needs at startup:
//! - where to listen
//! - how long a long-poll may hang before returning the unchanged feed
//! - whether rule assignment is seeded
//! - where the browser client's static files live
//!
//! Values come from `Default`, the `with_*` builders, or the environment
//! (`ServerConfig::from_env`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{ChatError, Result};

/// Default long-poll limit: one hour.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 3600;

/// Environment variable names read by [`ServerConfig::from_env`].
pub const ENV_BIND: &str = "NG_CHAT_BIND";
pub const ENV_POLL_TIMEOUT_SECS: &str = "NG_CHAT_POLL_TIMEOUT_SECS";
pub const ENV_SEED: &str = "NG_CHAT_SEED";
pub const ENV_PAGE_DIR: &str = "NG_CHAT_PAGE_DIR";

/// Process-wide configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP gateway listens on.
    pub bind: SocketAddr,

    /// Upper bound on how long a fetch waits for new messages.
    pub poll_timeout_secs: u64,

    /// Seed for rule assignment. `None` draws from entropy.
    pub rng_seed: Option<u64>,

    /// Directory holding `index.html`, `main.js` and `style.css`.
    pub page_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT_SECS,
            rng_seed: None,
            page_dir: PathBuf::from("page"),
        }
    }
}

impl ServerConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the listen address.
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Set the long-poll limit.
    #[must_use]
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout_secs = timeout.as_secs();
        self
    }

    /// Seed rule assignment.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Set the static page directory.
    #[must_use]
    pub fn with_page_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.page_dir = dir.into();
        self
    }

    /// The long-poll limit as a `Duration`.
    #[must_use]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Build from process environment variables, keeping defaults for unset keys.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup(ENV_BIND) {
            config.bind = v.trim().parse().map_err(|e| ChatError::Config {
                key: ENV_BIND,
                reason: format!("{e}"),
            })?;
        }

        if let Some(v) = lookup(ENV_POLL_TIMEOUT_SECS) {
            let secs = v.trim().parse::<u64>().map_err(|e| ChatError::Config {
                key: ENV_POLL_TIMEOUT_SECS,
                reason: format!("{e}"),
            })?;
            if secs == 0 {
                return Err(ChatError::Config {
                    key: ENV_POLL_TIMEOUT_SECS,
                    reason: "must be at least 1 second".to_string(),
                });
            }
            config.poll_timeout_secs = secs;
        }

        if let Some(v) = lookup(ENV_SEED) {
            let seed = v.trim().parse::<u64>().map_err(|e| ChatError::Config {
                key: ENV_SEED,
                reason: format!("{e}"),
            })?;
            config.rng_seed = Some(seed);
        }

        if let Some(v) = lookup(ENV_PAGE_DIR) {
            config.page_dir = PathBuf::from(v);
        }

        Ok(config)
    }
}
