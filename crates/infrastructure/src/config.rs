//! Application configuration

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// DAV surface configuration
    #[serde(default)]
    pub dav: DavConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: None,
        }
    }
}

/// DAV surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DavConfig {
    /// Path prefix the DAV tree is mounted under; hrefs in responses
    /// include it
    #[serde(default = "default_mount_path")]
    pub mount_path: String,

    /// Realm announced in the Basic auth challenge
    #[serde(default = "default_realm")]
    pub realm: String,
}

impl Default for DavConfig {
    fn default() -> Self {
        Self {
            mount_path: default_mount_path(),
            realm: default_realm(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5232
}

fn default_mount_path() -> String {
    "/dav".to_string()
}

fn default_realm() -> String {
    "WebDAV".to_string()
}

impl AppConfig {
    /// Load configuration from `haven.toml` (optional) and `HAVEN_*`
    /// environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("dav.mount_path", default_mount_path())?
            .set_default("dav.realm", default_realm())?
            // Load from file if exists
            .add_source(config::File::with_name("haven").required(false))
            // Override with environment variables (e.g., HAVEN_SERVER_PORT)
            .add_source(
                config::Environment::with_prefix("HAVEN")
                    .separator("_")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
