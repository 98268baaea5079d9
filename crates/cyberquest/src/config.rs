//! Service configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Project URL used when none is configured.
pub const PLACEHOLDER_URL: &str = "https://your-project.supabase.co";

/// Project key used when none is configured.
pub const PLACEHOLDER_ANON_KEY: &str = "your-anon-key";

/// Settings for the HTTP service and its backend project.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the hosted project.
    supabase_url: String,

    /// Public (anon) API key of the project.
    supabase_anon_key: String,

    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,
}

#[instrument]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[instrument]
fn default_port() -> u16 {
    3000
}

/// Optional overrides read from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    host: Option<String>,
    port: Option<u16>,
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

impl AppConfig {
    /// Creates a configuration from explicit values.
    #[instrument(skip(supabase_anon_key))]
    pub fn new(supabase_url: String, supabase_anon_key: String, host: String, port: u16) -> Self {
        Self {
            supabase_url,
            supabase_anon_key,
            host,
            port,
        }
    }

    /// Reads `SUPABASE_URL` and `SUPABASE_ANON_KEY`, also accepting the
    /// `VITE_` prefixed names.
    ///
    /// Missing credentials are not fatal: a warning is logged and
    /// placeholder values are used, so every backend call will fail until
    /// they are set.
    #[instrument]
    pub fn from_env() -> Self {
        let url = first_env(&["SUPABASE_URL", "VITE_SUPABASE_URL"]);
        let key = first_env(&["SUPABASE_ANON_KEY", "VITE_SUPABASE_ANON_KEY"]);

        if url.is_none() || key.is_none() {
            warn!(
                "Supabase credentials not found. Set SUPABASE_URL and SUPABASE_ANON_KEY \
                 (or the VITE_ prefixed names) in the environment."
            );
        }

        Self::new(
            url.unwrap_or_else(|| PLACEHOLDER_URL.to_string()),
            key.unwrap_or_else(|| PLACEHOLDER_ANON_KEY.to_string()),
            default_host(),
            default_port(),
        )
    }

    /// Overlays the values present in a TOML file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let file: FileConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        if let Some(url) = file.supabase_url {
            self.supabase_url = url;
        }
        if let Some(key) = file.supabase_anon_key {
            self.supabase_anon_key = key;
        }
        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }

        self.validate()?;
        info!(url = %self.supabase_url, "Config loaded successfully");
        Ok(self)
    }

    /// Replaces whichever parts of the bind address are given.
    pub fn with_bind(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Whether either credential is still a placeholder.
    pub fn uses_placeholders(&self) -> bool {
        self.supabase_url == PLACEHOLDER_URL || self.supabase_anon_key == PLACEHOLDER_ANON_KEY
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.supabase_url.starts_with("http://") || self.supabase_url.starts_with("https://"))
        {
            return Err(ConfigError::new(format!(
                "supabase_url must be an http(s) URL, got {}",
                self.supabase_url
            )));
        }
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
