//! Application configuration structs
//!
//! Loads configuration from environment variables, with a `.env` file picked
//! up when present.

use chrono::Duration;
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub snowflake: SnowflakeConfig,
    pub pending: PendingConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server configuration, reserved for the future transport layer
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub node_id: i64,
}

/// TTLs for pending admission records
///
/// Zero disables expiry for that channel.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingConfig {
    #[serde(default = "default_join_request_ttl_hours")]
    pub join_request_ttl_hours: i64,
    #[serde(default = "default_invitation_ttl_hours")]
    pub invitation_ttl_hours: i64,
}

impl PendingConfig {
    /// TTL applied to new join requests, `None` when disabled
    #[must_use]
    pub fn join_request_ttl(&self) -> Option<Duration> {
        (self.join_request_ttl_hours > 0).then(|| Duration::hours(self.join_request_ttl_hours))
    }

    /// TTL applied to new invitations, `None` when disabled
    #[must_use]
    pub fn invitation_ttl(&self) -> Option<Duration> {
        (self.invitation_ttl_hours > 0).then(|| Duration::hours(self.invitation_ttl_hours))
    }
}

impl Default for PendingConfig {
    fn default() -> Self {
        Self {
            join_request_ttl_hours: default_join_request_ttl_hours(),
            invitation_ttl_hours: default_invitation_ttl_hours(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "guild-server".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8370
}

fn default_join_request_ttl_hours() -> i64 {
    72 // 3 days
}

fn default_invitation_ttl_hours() -> i64 {
    168 // 7 days
}

const NODE_ID_MAX: i64 = 1023;

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable holds a value that cannot be used
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let node_id = match env::var("SNOWFLAKE_NODE_ID") {
            Ok(raw) => {
                let parsed: i64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SNOWFLAKE_NODE_ID", raw.clone()))?;
                if !(0..=NODE_ID_MAX).contains(&parsed) {
                    return Err(ConfigError::InvalidValue("SNOWFLAKE_NODE_ID", raw));
                }
                parsed
            }
            Err(_) => 0,
        };

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_port),
            },
            snowflake: SnowflakeConfig { node_id },
            pending: PendingConfig {
                join_request_ttl_hours: parse_ttl("JOIN_REQUEST_TTL_HOURS")?
                    .unwrap_or_else(default_join_request_ttl_hours),
                invitation_ttl_hours: parse_ttl("INVITATION_TTL_HOURS")?
                    .unwrap_or_else(default_invitation_ttl_hours),
            },
        })
    }
}

fn parse_ttl(var: &'static str) -> Result<Option<i64>, ConfigError> {
    match env::var(var) {
        Ok(raw) => {
            let hours: i64 = raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue(var, raw.clone()))?;
            if hours < 0 {
                return Err(ConfigError::InvalidValue(var, raw));
            }
            Ok(Some(hours))
        }
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
