//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// GL posting configuration.
    #[serde(default)]
    pub posting: PostingConfig,
    /// Fee schedule overrides, keyed by transaction kind.
    #[serde(default)]
    pub fees: Vec<FeeOverride>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// GL posting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    /// Largest debit/credit difference accepted as balanced.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: Decimal,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            balance_tolerance: default_balance_tolerance(),
        }
    }
}

fn default_balance_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// A single fee schedule override.
///
/// Exactly one of `fixed` or `rate` is expected; `min`/`max` only apply to `rate`.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeOverride {
    /// Transaction kind, e.g. `momo_cash_out`.
    pub kind: String,
    /// Flat fee.
    pub fixed: Option<Decimal>,
    /// Percentage rate (1.5 means 1.5 %).
    pub rate: Option<Decimal>,
    /// Lower clamp for percentage fees.
    pub min: Option<Decimal>,
    /// Upper clamp for percentage fees.
    pub max: Option<Decimal>,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BRANCHBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
