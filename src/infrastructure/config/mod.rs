use serde::{Deserialize, Serialize};
use std::net::{AddrParseError, SocketAddr};

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl std::fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub index: IndexConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Value of the `Server` header on every response
    pub identity: String,
}

/// Object storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub protocol: String,
    pub host: String,
    pub port: u16,
    pub download_bucket: String,
    pub streaming_bucket: String,
    pub subtitle_bucket: String,
    pub connect_timeout_seconds: u64,
}

/// Document index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL, empty when no index is deployed
    pub url: String,
    pub name: String,
    pub document_type: String,
    pub timeout_seconds: u64,
}

/// Capability key configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub key_salt: String,
    /// Verify the key carried by download routes as well
    pub enforce_download_key: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

/// Flat variable names used by existing deployments, and the keys they set
const LEGACY_ENV_KEYS: [(&str, &str); 8] = [
    ("MINIO_HOST", "storage.host"),
    ("MINIO_PORT", "storage.port"),
    ("MINIO_PROTOCOL", "storage.protocol"),
    ("MINIO_DOWNLOAD_BUCKET", "storage.download_bucket"),
    ("MINIO_STREAMING_BUCKET", "storage.streaming_bucket"),
    ("MINIO_SUBTITLE_BUCKET", "storage.subtitle_bucket"),
    ("ELASTICSEARCH_URL", "index.url"),
    ("SALT", "security.key_salt"),
];

type Builder = config::ConfigBuilder<config::builder::DefaultState>;

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        // Detect runtime mode from environment (default: local)
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // For local mode only, load an optional gateway.local.{toml,yaml,json}
        if mode == RuntimeMode::Local {
            builder = builder.add_source(config::File::with_name("gateway.local").required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("STREAM_GATEWAY").separator("__").try_parsing(true),
        );

        builder = Self::with_defaults(builder, mode)?;
        builder = Self::with_legacy_env(builder, |name| std::env::var(name).ok())?;

        builder.build()?.try_deserialize()
    }

    /// Defaults for every key, dependent on runtime mode
    fn with_defaults(builder: Builder, mode: RuntimeMode) -> Result<Builder, config::ConfigError> {
        let log_format = match mode {
            RuntimeMode::Local => "pretty",
            RuntimeMode::Production => "json",
        };

        builder
            .set_default("mode", mode.to_string())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.identity", "B!gGo-Streamer")?
            .set_default("storage.protocol", "http")?
            .set_default("storage.host", "localhost")?
            .set_default("storage.port", 9000)?
            .set_default("storage.download_bucket", "download")?
            .set_default("storage.streaming_bucket", "streaming")?
            .set_default("storage.subtitle_bucket", "subtitle")?
            .set_default("storage.connect_timeout_seconds", 10)?
            .set_default("index.url", "")?
            .set_default("index.name", "heimdallr_streaming")?
            .set_default("index.document_type", "doc")?
            .set_default("index.timeout_seconds", 5)?
            .set_default("security.key_salt", "")?
            .set_default("security.enforce_download_key", false)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", log_format)
    }

    /// Apply the flat legacy variables on top of everything else
    fn with_legacy_env<F>(mut builder: Builder, lookup: F) -> Result<Builder, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (name, key) in LEGACY_ENV_KEYS {
            let value = lookup(name).filter(|v| !v.is_empty());
            builder = builder.set_override_option(key, value)?;
        }
        Ok(builder)
    }
}

impl ServerConfig {
    /// Get the socket address for binding
    ///
    /// # Errors
    /// Returns an error if the host/port pair is not a valid socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}
