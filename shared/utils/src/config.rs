use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{ExecBomError, ExecBomResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub import: ImportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Grids with more rows than this are rejected before classification.
    pub max_rows: usize,
    pub merge_duplicate_lines: bool,
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Local overrides (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("EXECBOM").separator("__"));

        config.build()?.try_deserialize()
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> ExecBomResult<()> {
        if self.server.port == 0 {
            return Err(ExecBomError::configuration("server.port must be non-zero"));
        }
        if self.server.max_request_size == 0 {
            return Err(ExecBomError::configuration("server.max_request_size must be non-zero"));
        }
        if self.import.max_rows == 0 {
            return Err(ExecBomError::configuration("import.max_rows must be non-zero"));
        }
        if self.import.allowed_extensions.is_empty() {
            return Err(ExecBomError::configuration("import.allowed_extensions must not be empty"));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8087,
            max_request_size: 16 * 1024 * 1024, // 16MB
            timeout_seconds: 30,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: 50_000,
            merge_duplicate_lines: false,
            allowed_extensions: ["xlsx", "xlsm", "xls", "csv", "tsv", "txt"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
            file_path: None,
        }
    }
}
