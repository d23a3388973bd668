//! Fixtures
//!
//! YAML promotion sets and carts. Promotion sets live under
//! `<base>/promotions/<name>.yml` and carts under `<base>/carts/<name>.yml`.

use std::{fs, path::PathBuf};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{Currency, EUR, GBP, USD};
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    cart::CartRequest,
    catalog::InMemoryCatalog,
    fixtures::{carts::CartFixture, promotions::PromotionsFixture},
    pricing::PricingError,
    promotions::{PromotionKey, PromotionMeta, UnknownCategory},
};

pub mod carts;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Unknown promotion category
    #[error(transparent)]
    UnknownCategory(#[from] UnknownCategory),

    /// Invalid promotion data
    #[error("Invalid promotion data: {0}")]
    InvalidPromotionData(String),

    /// A cart line could not be priced
    #[error("Invalid cart line: {0}")]
    LineItem(#[from] PricingError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Promotions loaded so far
    catalog: InMemoryCatalog,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: InMemoryCatalog::new(),
        }
    }

    /// Load promotions from a YAML fixture file, appending them to the catalog in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a promotion is invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        let count = fixture.promotions.len();

        for promotion_fixture in fixture.promotions {
            let (meta, promotion) = promotion_fixture.try_into_promotion()?;

            self.catalog.insert(meta.name, promotion);
        }

        debug!(fixture = name, count, "loaded promotion fixture");

        Ok(self)
    }

    /// Load a cart request from a YAML fixture file.
    ///
    /// A file holding `null` yields `None`; `items: null` yields a request without items.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a line is invalid.
    pub fn cart(&self, name: &str) -> Result<Option<CartRequest<'static>>, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: Option<CartFixture> = serde_norway::from_str(&contents)?;

        fixture.map(CartRequest::try_from).transpose()
    }

    /// The promotions loaded so far
    pub fn catalog(&self) -> &InMemoryCatalog {
        &self.catalog
    }

    /// Consume the fixture and return its catalog.
    pub fn into_catalog(self) -> InMemoryCatalog {
        self.catalog
    }

    /// Get the promotion metadata `SlotMap`
    pub fn promotion_meta_map(&self) -> &SlotMap<PromotionKey, PromotionMeta> {
        self.catalog.promotion_meta_map()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
