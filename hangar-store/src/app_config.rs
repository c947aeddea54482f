use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub kafka: KafkaConfig,
    pub grpc: GrpcClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 { 10 }

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

fn default_max_connections() -> u32 { 5 }

fn default_true() -> bool { true }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub order_paid_topic: String,
    pub order_assembled_topic: String,
    pub consumer_group_id: String,
    /// Pause before a failed assembled-events consumer is recreated.
    #[serde(default = "default_restart_backoff")]
    pub consumer_restart_backoff_ms: u64,
}

fn default_restart_backoff() -> u64 { 1000 }

impl KafkaConfig {
    pub fn consumer_restart_backoff(&self) -> Duration {
        Duration::from_millis(self.consumer_restart_backoff_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrpcClientConfig {
    pub inventory_url: String,
    pub payment_url: String,
    #[serde(default = "default_grpc_timeout")]
    pub timeout_ms: u64,
}

fn default_grpc_timeout() -> u64 { 3000 }

impl GrpcClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `HANGAR__KAFKA__BROKERS=kafka:9092` sets `kafka.brokers`
            .add_source(config::Environment::with_prefix("HANGAR").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULTS: &str = include_str!("../../config/default.toml");

    fn from_defaults() -> Config {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_file_is_complete() {
        let cfg = from_defaults();

        assert_eq!(cfg.storage.backend, StorageBackend::Postgres);
        assert_eq!(cfg.kafka.order_paid_topic, "order.paid");
        assert_eq!(cfg.kafka.order_assembled_topic, "order.assembled");
        assert!(cfg.grpc.timeout() > Duration::ZERO);
        assert!(cfg.server.request_timeout() > Duration::ZERO);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULTS, config::FileFormat::Toml))
            .set_override("storage.backend", "memory")
            .unwrap()
            .set_override("kafka.consumer_restart_backoff_ms", 250)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.kafka.consumer_restart_backoff(), Duration::from_millis(250));
    }
}
