//! Configuration for Dirmux

use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_TIMEOUT_SECONDS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Configured directory servers, in dispatch order
    #[serde(default)]
    pub servers: Vec<ServerProfile>,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Keep listing users whose directory entry vanished, as disabled
    /// remnants, instead of dropping them from management surfaces
    #[serde(default)]
    pub mark_remnants_as_disabled: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            cache: CacheConfig::default(),
            mark_remnants_as_disabled: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl ProxyConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(ttl) = std::env::var("DIRMUX_CACHE_TTL_SECONDS") {
            if let Ok(t) = ttl.parse() {
                config.cache.ttl_seconds = t;
            }
        }
        if std::env::var("DIRMUX_MARK_REMNANTS_AS_DISABLED")
            .map(|v| v == "true")
            .unwrap_or(false)
        {
            config.mark_remnants_as_disabled = true;
        }
        if let Ok(level) = std::env::var("DIRMUX_LOG_LEVEL") {
            config.logging.level = level;
        }

        config
    }

    /// Ordered configuration prefixes of all declared servers.
    pub fn prefixes(&self) -> Vec<&str> {
        self.servers.iter().map(|s| s.prefix.as_str()).collect()
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.servers.is_empty() {
            return Err(crate::Error::NoServersConfigured);
        }

        let mut seen = std::collections::HashSet::new();
        for server in &self.servers {
            if server.prefix.is_empty() {
                return Err(crate::Error::InvalidConfig(
                    "Server prefix must not be empty".into(),
                ));
            }
            if !seen.insert(server.prefix.as_str()) {
                return Err(crate::Error::DuplicatePrefix(server.prefix.clone()));
            }
            if server.url.is_empty() {
                return Err(crate::Error::InvalidConfig(format!(
                    "Server {} has no URL",
                    server.prefix
                )));
            }
        }

        Ok(())
    }
}

/// One directory server connection profile.
///
/// The prefix is the unique routing key; everything else is handed to
/// the backend implementation as an opaque connection hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerProfile {
    /// Unique configuration prefix, e.g. "s01"
    pub prefix: String,

    /// Server URL, e.g. "ldap://directory.example.com:389"
    pub url: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

/// Affinity cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for cached user-to-backend routes (seconds)
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_cache_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
