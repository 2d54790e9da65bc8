use secrecy::Secret;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store_backend: StoreBackend,

    // Required only for the postgres backend
    pub database_url: Option<Secret<String>>,
    pub database_max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolsTransport {
    Stdio,
    Http,
}

/// Settings for the agent tool server
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    pub host: String,
    pub port: u16,
    pub ticket_service_url: String,
    pub transport: ToolsTransport,
}

fn load_env() -> Result<config::Config, config::ConfigError> {
    // Load .env file if it exists (for local development)
    let _ = dotenvy::dotenv();

    config::Config::builder()
        .add_source(config::Environment::default().separator("__"))
        .build()
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(load_env()?)
    }

    fn from_source(config: config::Config) -> Result<Self, config::ConfigError> {
        let store_backend = match config.get::<String>("store_backend") {
            Ok(raw) => parse_store_backend(&raw)?,
            Err(_) => StoreBackend::Postgres,
        };

        let database_url = config
            .get::<String>("database_url")
            .ok()
            .map(Secret::new);
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(config::ConfigError::NotFound("database_url".to_string()));
        }

        Ok(Self {
            host: config.get("host").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: config.get("port").unwrap_or(8080),
            store_backend,
            database_url,
            database_max_connections: config.get("database_max_connections").unwrap_or(20),
        })
    }
}

impl ToolsConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(load_env()?)
    }

    fn from_source(config: config::Config) -> Result<Self, config::ConfigError> {
        let transport = match config.get::<String>("tools_transport") {
            Ok(raw) => match raw.to_ascii_lowercase().as_str() {
                "stdio" => ToolsTransport::Stdio,
                "http" => ToolsTransport::Http,
                other => {
                    return Err(config::ConfigError::Message(format!(
                        "unknown tools_transport '{}', expected stdio or http",
                        other
                    )))
                }
            },
            Err(_) => ToolsTransport::Stdio,
        };

        Ok(Self {
            host: config.get("host").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: config.get("port").unwrap_or(8080),
            ticket_service_url: config.get("ticket_service_url")?,
            transport,
        })
    }
}

fn parse_store_backend(raw: &str) -> Result<StoreBackend, config::ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "postgres" => Ok(StoreBackend::Postgres),
        "memory" => Ok(StoreBackend::Memory),
        other => Err(config::ConfigError::Message(format!(
            "unknown store_backend '{}', expected postgres or memory",
            other
        ))),
    }
}
