//! Promotion Fixtures

use rustc_hash::FxHashSet;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, parse_price},
    promotions::{Promotion, PromotionCategory, PromotionKey, PromotionMeta, RequiredItem},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotions in evaluation order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion name
    pub name: String,

    /// Category name (e.g. `SingleItem`, `MultiItem`)
    pub category: String,

    /// Whether the promotion is active
    #[serde(default = "active_by_default")]
    pub active: bool,

    /// Promotion price (e.g. "130 GBP")
    pub price: String,

    /// Required SKUs and quantities
    pub items: Vec<RequiredItemFixture>,
}

/// Required item fixture from YAML
#[derive(Debug, Deserialize)]
pub struct RequiredItemFixture {
    /// Required SKU
    pub sku: String,

    /// Required quantity
    pub quantity: u32,
}

fn active_by_default() -> bool {
    true
}

impl PromotionFixture {
    /// Convert to `PromotionMeta` and `Promotion`
    ///
    /// The returned promotion carries a default key; the catalog assigns the real one.
    ///
    /// # Errors
    ///
    /// Returns an error if the category, price or required items are invalid.
    pub fn try_into_promotion(self) -> Result<(PromotionMeta, Promotion<'static>), FixtureError> {
        let category: PromotionCategory = self.category.parse()?;
        let (minor_units, currency) = parse_price(&self.price)?;

        let valid_count = match category {
            PromotionCategory::SingleItem => self.items.len() == 1,
            PromotionCategory::MultiItem => self.items.len() >= 2,
        };

        if !valid_count {
            return Err(FixtureError::InvalidPromotionData(format!(
                "{}: {category} promotion cannot have {} required items",
                self.name,
                self.items.len()
            )));
        }

        if let Some(zero) = self.items.iter().find(|item| item.quantity == 0) {
            return Err(FixtureError::InvalidPromotionData(format!(
                "{}: required quantity of {} must be greater than zero",
                self.name, zero.sku
            )));
        }

        let mut seen = FxHashSet::default();

        if let Some(repeated) = self.items.iter().find(|item| !seen.insert(item.sku.as_str())) {
            return Err(FixtureError::InvalidPromotionData(format!(
                "{}: required item {} is listed more than once",
                self.name, repeated.sku
            )));
        }

        let required_items = self
            .items
            .into_iter()
            .map(|item| RequiredItem::new(item.sku, item.quantity));

        let promotion = Promotion::new(
            PromotionKey::default(),
            category,
            Money::from_minor(minor_units, currency),
            required_items,
        )
        .with_active(self.active);

        Ok((PromotionMeta { name: self.name }, promotion))
    }
}
