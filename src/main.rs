//! Promotion Engine CLI
//!
//! Prices a cart fixture against a promotion fixture and prints the receipt.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use promotion_engine::{
    checkout::{CartService, CartServiceError},
    config::{EngineConfig, LogFormat, LoggingConfig},
    fixtures::Fixture,
    receipt::Receipt,
};

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true);

    match config.log_format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().with_current_span(true).init(),
    }
}

/// Promotion engine entry point
fn main() -> Result<ExitCode> {
    let config = EngineConfig::load()?;

    init_logging(&config.logging);

    let enabled = config.enabled_categories()?;

    let mut fixture = Fixture::with_base_path(&config.fixtures_dir);
    fixture.load_promotions(&config.promotions)?;

    let cart = fixture.cart(&config.cart)?;

    info!(
        cart = %config.cart,
        promotions = %config.promotions,
        %enabled,
        "pricing cart"
    );

    let service = CartService::new(fixture.into_catalog(), enabled);

    let priced = match service.calculate_total_promotion_price(cart) {
        Ok(priced) => priced,
        Err(CartServiceError::Validation(errors)) => {
            let mut stderr = io::stderr().lock();

            for message in errors.messages() {
                writeln!(stderr, "{message}")?;
            }

            return Ok(ExitCode::FAILURE);
        }
        Err(error) => return Err(error.into()),
    };

    let receipt = Receipt::from_cart(&priced)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    receipt.write_to(&mut handle, &priced, service.catalog().promotion_meta_map())?;

    Ok(ExitCode::SUCCESS)
}
