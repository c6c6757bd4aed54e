//! Configuration management for the exchange planner
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::PlannerError;
use crate::planner::BudgetPolicy;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "PLANNER_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Storage backend selection
    pub storage: StorageConfig,
    /// Bearer token validation
    pub auth: AuthConfig,
    /// External transport search provider
    pub transport: TransportConfig,
    /// Budget forecast policy
    pub budget: BudgetConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u32,
    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,
}

/// Storage backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file; the in-memory store is used when unset
    pub database_path: Option<PathBuf>,
    /// Fill empty stores with the demo calendar, trips and catalog
    pub seed_demo_data: bool,
}

/// Bearer token validation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Skip token validation and run every request as the demo user
    pub disabled: bool,
    /// HMAC secret used to verify HS256 tokens
    pub jwt_secret: Option<String>,
}

/// External transport provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Query the provider before falling back to catalog quotes
    pub enabled: bool,
    /// Provider API root
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Retries for transient failures
    pub max_retries: u32,
}

/// Budget forecast policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Monthly budget assumed when a user has none on record
    pub default_monthly_budget: f64,
    /// Remaining budget below which the forecast turns amber
    pub amber_threshold: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

fn default_transport_base_url() -> String {
    "https://transport.opendata.ch/v1".to_string()
}

fn default_transport_timeout_ms() -> u64 {
    2500
}

fn default_transport_max_retries() -> u32 {
    1
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_demo_data: true,
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_transport_base_url(),
            timeout_ms: default_transport_timeout_ms(),
            max_retries: default_transport_max_retries(),
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        let policy = BudgetPolicy::default();
        Self {
            default_monthly_budget: policy.default_monthly_budget,
            amber_threshold: policy.amber_threshold,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl BudgetConfig {
    #[must_use]
    pub fn policy(&self) -> BudgetPolicy {
        BudgetPolicy {
            default_monthly_budget: self.default_monthly_budget,
            amber_threshold: self.amber_threshold,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl PlannerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as PLANNER_SERVER__PORT=9000
        builder = builder.add_source(
            Environment::with_prefix("PLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("exchange-planner").join("config.toml"))
    }

    /// Apply default values to zeroed or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.max_body_bytes == 0 {
            self.server.max_body_bytes = default_max_body_bytes();
        }
        if self.transport.base_url.is_empty() {
            self.transport.base_url = default_transport_base_url();
        }
        self.transport.base_url = self.transport.base_url.trim_end_matches('/').to_string();
        if self.transport.timeout_ms == 0 {
            self.transport.timeout_ms = default_transport_timeout_ms();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_secrets()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the token secret
    pub fn validate_secrets(&self) -> Result<()> {
        if let Some(secret) = &self.auth.jwt_secret {
            if secret.trim().is_empty() {
                return Err(PlannerError::config(
                    "JWT secret cannot be empty if provided. \
                     Either remove it or provide a valid secret."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PlannerError::config("Server port cannot be 0").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(PlannerError::config(
                "Request timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.transport.timeout_ms > 60_000 {
            return Err(PlannerError::config(
                "Transport provider timeout cannot exceed 60000 ms"
            ).into());
        }

        if self.transport.max_retries > 10 {
            return Err(PlannerError::config(
                "Transport provider max retries cannot exceed 10"
            ).into());
        }

        if self.budget.default_monthly_budget < 0.0 || self.budget.amber_threshold < 0.0 {
            return Err(PlannerError::config(
                "Budget defaults cannot be negative"
            ).into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlannerError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlannerError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        let base_url = &self.transport.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(PlannerError::config(
                "Transport provider base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}
