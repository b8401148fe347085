use chrono::Utc;
use stream_gateway::{
    domain::value_objects::{CapabilityKey, YearMonth},
    infrastructure::config::{
        AppConfig, IndexConfig, LogFormat, LoggingConfig, RuntimeMode, SecurityConfig,
        ServerConfig, StorageConfig,
    },
};
use wiremock::MockServer;

pub const SALT: &str = "integration-salt";
pub const IDENTITY: &str = "B!gGo-Streamer";
pub const INDEX_NAME: &str = "heimdallr_streaming";

pub fn storage_config(storage: &MockServer) -> StorageConfig {
    let address = storage.address();
    StorageConfig {
        protocol: "http".to_string(),
        host: address.ip().to_string(),
        port: address.port(),
        download_bucket: "download".to_string(),
        streaming_bucket: "streaming".to_string(),
        subtitle_bucket: "subtitle".to_string(),
        connect_timeout_seconds: 2,
    }
}

pub fn index_config(url: &str) -> IndexConfig {
    IndexConfig {
        url: url.to_string(),
        name: INDEX_NAME.to_string(),
        document_type: "doc".to_string(),
        timeout_seconds: 2,
    }
}

pub fn test_config(storage: &MockServer, index_url: &str) -> AppConfig {
    AppConfig {
        mode: RuntimeMode::Local,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            identity: IDENTITY.to_string(),
        },
        storage: storage_config(storage),
        index: index_config(index_url),
        security: SecurityConfig { key_salt: SALT.to_string(), enforce_download_key: false },
        logging: LoggingConfig { level: "debug".to_string(), format: LogFormat::Compact },
    }
}

/// Key valid for the current month
pub fn current_key() -> String {
    CapabilityKey::derive(YearMonth::of(Utc::now()), SALT).to_string()
}

/// Key for a month well outside the acceptance window
pub fn stale_key() -> String {
    let mut month = YearMonth::of(Utc::now());
    for _ in 0..3 {
        month = month.previous();
    }
    CapabilityKey::derive(month, SALT).to_string()
}

/// An address nothing listens on
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
