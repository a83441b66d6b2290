//! Configuration settings structure
//!
//! Defines the main settings structure and loading logic for the client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_authority() -> String {
    "https://www.humblebundle.com/".to_string()
}

fn default_user_agent() -> String {
    "HumbleBundle plugin for GOG Galaxy 2.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Optional duration serialized as whole seconds
mod opt_duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

/// Main configuration settings for the client
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Remote service configuration
    #[serde(default)]
    pub api: ApiSettings,
    /// Network configuration
    #[serde(default)]
    pub network: NetworkSettings,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Remote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base authority every request path is resolved against
    #[serde(default = "default_authority")]
    pub authority: String,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Transport-level request timeout; unset means no deadline
    #[serde(default, with = "opt_duration_secs")]
    pub timeout: Option<Duration>,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkSettings {
    /// HTTPS proxy URL
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// HTTP proxy URL
    #[serde(default)]
    pub http_proxy: Option<String>,
    /// Proxy used for every scheme
    #[serde(default)]
    pub all_proxy: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            authority: default_authority(),
            user_agent: default_user_agent(),
            timeout: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            verbose: false,
        }
    }
}

impl Settings {
    /// Settings pointing at a different authority, everything else default
    pub fn with_authority(authority: impl Into<String>) -> Self {
        let mut settings = Self::default();
        settings.api.authority = authority.into();
        settings
    }

    /// Load settings from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut settings = Self::default();

        if let Ok(authority) = std::env::var("HUMBLE_AUTHORITY") {
            settings.api.authority = authority;
        }

        if let Ok(user_agent) = std::env::var("HUMBLE_USER_AGENT") {
            settings.api.user_agent = user_agent;
        }

        if let Ok(timeout) = std::env::var("HUMBLE_TIMEOUT") {
            let secs: u64 = timeout
                .parse()
                .map_err(|e| crate::Error::config(format!("Invalid timeout: {}", e)))?;
            settings.api.timeout = Some(Duration::from_secs(secs));
        }

        settings.network.https_proxy = std::env::var("HTTPS_PROXY").ok();
        settings.network.http_proxy = std::env::var("HTTP_PROXY").ok();
        settings.network.all_proxy = std::env::var("ALL_PROXY").ok();

        if let Ok(level) = std::env::var("HUMBLE_LOG_LEVEL") {
            settings.logging.level = level;
        }

        Ok(settings)
    }

    /// Load settings from a TOML configuration file
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        toml::from_str(&content)
            .map_err(|e| crate::Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Merge settings with environment variable overrides
    pub fn merge_with_env(mut self) -> crate::Result<Self> {
        let env_settings = Self::from_env()?;
        let defaults = Self::default();

        if env_settings.api.authority != defaults.api.authority {
            self.api.authority = env_settings.api.authority;
        }

        if env_settings.api.user_agent != defaults.api.user_agent {
            self.api.user_agent = env_settings.api.user_agent;
        }

        if env_settings.api.timeout.is_some() {
            self.api.timeout = env_settings.api.timeout;
        }

        if env_settings.logging.level != defaults.logging.level {
            self.logging.level = env_settings.logging.level;
        }

        // Proxies always override when present
        if env_settings.network.https_proxy.is_some() {
            self.network.https_proxy = env_settings.network.https_proxy;
        }
        if env_settings.network.http_proxy.is_some() {
            self.network.http_proxy = env_settings.network.http_proxy;
        }
        if env_settings.network.all_proxy.is_some() {
            self.network.all_proxy = env_settings.network.all_proxy;
        }

        Ok(self)
    }

    /// Get effective proxy URL based on priority
    pub fn get_proxy_url(&self) -> Option<String> {
        self.network
            .https_proxy
            .as_ref()
            .or(self.network.http_proxy.as_ref())
            .or(self.network.all_proxy.as_ref())
            .cloned()
    }

    /// Parsed base authority
    pub fn authority_url(&self) -> crate::Result<url::Url> {
        let url = url::Url::parse(&self.api.authority)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(crate::Error::config(format!(
                "Unsupported authority scheme '{}' in {}",
                other, self.api.authority
            ))),
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.authority_url().map_err(|e| {
            crate::Error::config(format!("Invalid authority '{}': {}", self.api.authority, e))
        })?;

        if self.api.user_agent.trim().is_empty() {
            return Err(crate::Error::config("User agent cannot be empty"));
        }

        if self.api.timeout == Some(Duration::ZERO) {
            return Err(crate::Error::config("Timeout cannot be 0"));
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(crate::Error::config(format!(
                    "Invalid log level: {}",
                    self.logging.level
                )));
            }
        }

        for (name, proxy_url) in [
            ("https_proxy", &self.network.https_proxy),
            ("http_proxy", &self.network.http_proxy),
            ("all_proxy", &self.network.all_proxy),
        ] {
            if let Some(url_str) = proxy_url
                && let Err(e) = url::Url::parse(url_str)
            {
                return Err(crate::Error::config(format!(
                    "Invalid {} '{}': {}",
                    name, url_str, e
                )));
            }
        }

        Ok(())
    }
}
