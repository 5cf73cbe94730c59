//! Server configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TICK_MS: u64 = 250;
const DEFAULT_GAME_TTL_SECS: u64 = 60 * 60;

/// Runtime settings for the API binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// YAML game script; the built-in script when unset.
    pub script_path: Option<PathBuf>,
    /// How often the background ticker fires due timers.
    pub tick_interval: Duration,
    /// How long a game may go without a request before it is evicted.
    pub game_ttl: Duration,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `GLITCHROOM_SCRIPT`, `GLITCHROOM_TICK_MS` and
    /// `GLITCHROOM_GAME_TTL_SECS`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let script_path = lookup("GLITCHROOM_SCRIPT")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);
        let tick_ms = positive(&lookup, "GLITCHROOM_TICK_MS", DEFAULT_TICK_MS)?;
        let ttl_secs = positive(&lookup, "GLITCHROOM_GAME_TTL_SECS", DEFAULT_GAME_TTL_SECS)?;

        Ok(Self {
            host,
            port,
            script_path,
            tick_interval: Duration::from_millis(tick_ms),
            game_ttl: Duration::from_secs(ttl_secs),
        })
    }

    /// `host:port` for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads a positive whole number, falling back to `default` when unset.
fn positive(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, AppError> {
    let value = match lookup(key) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| AppError::Config(format!("{key} must be a whole number: {e}")))?,
        None => default,
    };
    if value == 0 {
        return Err(AppError::Config(format!("{key} must be greater than zero")));
    }
    Ok(value)
}
