//! Configuration for actas-daemon

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Main daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Email delivery configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Signature workflow configuration
    #[serde(default)]
    pub signing: SigningConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            email: EmailConfig::default(),
            signing: SigningConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().expect("valid default address"),
            enable_cors: true,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (for development/testing)
    Memory,

    /// PostgreSQL storage
    Postgres {
        /// Connection URL
        url: String,

        /// Maximum connections in pool
        #[serde(default = "default_pool_size")]
        max_connections: u32,

        /// Connection timeout in seconds
        #[serde(default = "default_connection_timeout")]
        connect_timeout_secs: u64,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory
    }
}

/// Email delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EmailConfig {
    /// Log instead of delivering (for development/testing)
    Disabled,

    /// SMTP delivery
    Smtp {
        host: String,

        #[serde(default = "default_smtp_port")]
        port: u16,

        #[serde(default)]
        username: Option<String>,

        #[serde(default)]
        password: Option<String>,

        #[serde(default = "default_true")]
        use_tls: bool,

        from_address: String,

        #[serde(default)]
        from_name: Option<String>,
    },
}

impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig::Disabled
    }
}

/// Signature workflow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Base URL of the public signing surface; signing links are built
    /// relative to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bound on retries after a concurrent-update conflict
    #[serde(default = "default_max_update_attempts")]
    pub max_update_attempts: usize,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_update_attempts: default_max_update_attempts(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_pool_size() -> u32 {
    10
}

fn default_connection_timeout() -> u64 {
    5
}

fn default_smtp_port() -> u16 {
    587
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_max_update_attempts() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with ACTAS_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("ACTAS")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_local_and_offline() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(matches!(config.storage, StorageConfig::Memory));
        assert!(matches!(config.email, EmailConfig::Disabled));
    }

    #[test]
    fn signing_defaults() {
        let config = SigningConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_update_attempts, 3);
    }

    #[test]
    fn postgres_storage_deserializes_with_pool_defaults() {
        let json = serde_json::json!({
            "type": "postgres",
            "url": "postgres://localhost/actas",
        });
        let storage: StorageConfig = serde_json::from_value(json).unwrap();
        match storage {
            StorageConfig::Postgres {
                url,
                max_connections,
                connect_timeout_secs,
            } => {
                assert_eq!(url, "postgres://localhost/actas");
                assert_eq!(max_connections, 10);
                assert_eq!(connect_timeout_secs, 5);
            }
            other => panic!("unexpected storage config: {other:?}"),
        }
    }
}
