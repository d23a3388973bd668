//! Engine configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::{orchestrator::EnabledCategories, promotions::UnknownCategory};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Promotion engine configuration
#[derive(Debug, Parser)]
#[command(
    name = "promotion-engine",
    about = "Price a cart fixture against a promotion set",
    long_about = None
)]
pub struct EngineConfig {
    /// Cart fixture name, loaded from `<fixtures-dir>/carts/<cart>.yml`
    pub cart: String,

    /// Comma separated promotion categories to apply (`SingleItem`, `MultiItem`)
    #[arg(
        short,
        long,
        env = "ALLOWED_PROMOTION_TYPES",
        default_value = "SingleItem,MultiItem"
    )]
    pub allowed_promotion_types: String,

    /// Directory holding `promotions/` and `carts/` fixtures
    #[arg(short, long, env = "FIXTURES_DIR", default_value = "./fixtures")]
    pub fixtures_dir: PathBuf,

    /// Promotion fixture name, loaded from `<fixtures-dir>/promotions/<name>.yml`
    #[arg(short, long, env = "PROMOTIONS_FIXTURE", default_value = "standard")]
    pub promotions: String,

    /// Logging settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from `.env`, environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The promotion categories to apply.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCategory`] if a configured name is not a known category.
    pub fn enabled_categories(&self) -> Result<EnabledCategories, UnknownCategory> {
        self.allowed_promotion_types.parse()
    }
}
