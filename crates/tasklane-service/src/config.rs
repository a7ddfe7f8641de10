//! Service configuration, read once from the environment at startup.
//!
//! | variable | default |
//! |---|---|
//! | `RCV_PORT` | `8080` |
//! | `RCV_PATH` | `/` |
//! | `ENV` | `local` |
//! | `CONFIGURATION_SERVICE` | required unless `ENV=local` |
//! | `EVENTBROKER` | `http://localhost:8081/event` |
//! | `EVENT_NAMESPACE` | `sh.keptn` |
//! | `SERVICE_NAME` | `monaco-service` |
//! | `RESOURCE_ROOT` | `.` |
//! | `LOG_FORMAT` | `text` |

use std::path::PathBuf;

use crate::receiver::HEALTH_PATH;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PATH: &str = "/";
const LOCAL_ENV: &str = "local";
const DEFAULT_EVENT_BROKER: &str = "http://localhost:8081/event";
const DEFAULT_NAMESPACE: &str = "sh.keptn";
const DEFAULT_SERVICE_NAME: &str = "monaco-service";
const DEFAULT_RESOURCE_ROOT: &str = ".";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("RCV_PORT must be a port number, got '{0}'")]
    InvalidPort(String),

    #[error("RCV_PATH must start with '/', got '{0}'")]
    InvalidPath(String),

    #[error("RCV_PATH must not be /health")]
    ReservedPath,

    #[error("{0} is required when ENV is not 'local'")]
    Missing(&'static str),

    #[error("LOG_FORMAT must be 'text' or 'json', got '{0}'")]
    InvalidLogFormat(String),
}

/// Where task resources are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSource {
    Local { root: PathBuf },
    ConfigurationService { url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub path: String,
    pub resources: ResourceSource,
    pub event_broker_url: String,
    pub namespace: String,
    pub service_name: String,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let port = match var("RCV_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let path = or("RCV_PATH", DEFAULT_PATH);
        if !path.starts_with('/') {
            return Err(ConfigError::InvalidPath(path));
        }
        if path == HEALTH_PATH {
            return Err(ConfigError::ReservedPath);
        }

        let resources = if or("ENV", LOCAL_ENV) == LOCAL_ENV {
            ResourceSource::Local {
                root: PathBuf::from(or("RESOURCE_ROOT", DEFAULT_RESOURCE_ROOT)),
            }
        } else {
            ResourceSource::ConfigurationService {
                url: var("CONFIGURATION_SERVICE")
                    .ok_or(ConfigError::Missing("CONFIGURATION_SERVICE"))?,
            }
        };

        let log_format = match or("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => return Err(ConfigError::InvalidLogFormat(other.to_string())),
        };

        Ok(Self {
            port,
            path,
            resources,
            event_broker_url: or("EVENTBROKER", DEFAULT_EVENT_BROKER),
            namespace: or("EVENT_NAMESPACE", DEFAULT_NAMESPACE),
            service_name: or("SERVICE_NAME", DEFAULT_SERVICE_NAME),
            log_format,
        })
    }
}
