//! Application configuration loaded from environment variables.

use axum::http::HeaderValue;
use serde::Deserialize;

use crate::error::StartupError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Listen port. Passed to the listener as-is, so a bad value fails at bind time.
    #[serde(default = "default_port")]
    pub port: String,

    /// Origin allowed to make cross-origin browser requests.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Whether a `.env` file was found and loaded.
    #[serde(skip)]
    pub dotenv_loaded: bool,
}

fn default_port() -> String {
    "8080".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            frontend_url: default_frontend_url(),
            rust_log: default_log_level(),
            dotenv_loaded: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        let dotenv_loaded = dotenvy::dotenv().is_ok();
        let mut config = Self::from_env()?;
        config.dotenv_loaded = dotenv_loaded;
        Ok(config)
    }

    /// Load configuration from the process environment only.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env::<Self>().map(Self::with_fallbacks)
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Self>(vars).map(Self::with_fallbacks)
    }

    // Set-but-empty variables count as unset.
    fn with_fallbacks(mut self) -> Self {
        if self.port.is_empty() {
            self.port = default_port();
        }
        if self.frontend_url.is_empty() {
            self.frontend_url = default_frontend_url();
        }
        if self.rust_log.is_empty() {
            self.rust_log = default_log_level();
        }
        self
    }

    /// Address the HTTP listener binds to: the IPv6 wildcard, which also
    /// accepts IPv4 connections on dual-stack hosts.
    pub fn bind_addr(&self) -> String {
        format!("[::]:{}", self.port)
    }

    /// IPv4-only address used when the host has no IPv6 support.
    pub fn fallback_bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Public API base URL, for the startup banner.
    pub fn api_url(&self) -> String {
        format!("http://localhost:{}/api", self.port)
    }

    /// The frontend origin as a header value for the CORS layer.
    pub fn cors_origin(&self) -> Result<HeaderValue, StartupError> {
        HeaderValue::from_str(&self.frontend_url)
            .map_err(|_| StartupError::InvalidOrigin(self.frontend_url.clone()))
    }
}
