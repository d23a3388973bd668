//! Multi Item Strategy
//!
//! Bundle discounts requiring quantities of two or more distinct SKUs at once,
//! e.g. "C + D for 30".
//!
//! The bundle price is charged exactly once, on the first matching line in
//! cart order (the price-bearing line). Every matched line additionally pays
//! unit price for any quantity above its requirement. Cart order, not the
//! order of the promotion's definition, decides which line bears the price.

use rusty_money::{Money, iso::Currency};
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    items::LineItem,
    pricing::{PricingError, multiply},
    promotions::{Promotion, PromotionCategory, RequiredItem},
    strategies::{
        PromotionStrategy, StrategyError, claimed_skus, find_item, is_candidate, required,
    },
};

/// Evaluator for [`PromotionCategory::MultiItem`] promotions.
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiItemStrategy;

impl MultiItemStrategy {
    /// Create a new multi item strategy.
    pub fn new() -> Self {
        Self
    }
}

impl PromotionStrategy for MultiItemStrategy {
    fn category(&self) -> PromotionCategory {
        PromotionCategory::MultiItem
    }

    fn can_apply_promotion(
        &self,
        items: Option<&[LineItem<'_>]>,
        promotion: Option<&Promotion<'_>>,
    ) -> Result<bool, StrategyError> {
        let items = required(items, "cartItems")?;
        let promotion = required(promotion, "promotion")?;

        if !is_candidate(items, promotion, self.category()) {
            return Ok(false);
        }

        let required_skus: FxHashSet<&str> = promotion
            .required_items()
            .iter()
            .map(RequiredItem::sku)
            .collect();

        // Also rejects a cart holding the same SKU on two lines.
        let matching_lines = items
            .iter()
            .filter(|item| required_skus.contains(item.sku()))
            .count();

        if matching_lines != required_skus.len() {
            return Ok(false);
        }

        Ok(promotion.required_items().iter().all(|requirement| {
            find_item(items, requirement.sku())
                .is_some_and(|item| item.quantity() >= requirement.quantity())
        }))
    }

    fn apply_promotions<'a>(
        &self,
        items: Option<Vec<LineItem<'a>>>,
        promotions: Option<&[Promotion<'a>]>,
    ) -> Result<Vec<LineItem<'a>>, StrategyError> {
        let mut items = required(items, "cartItems")?;
        let promotions = required(promotions, "promotions")?;

        if items.is_empty() || promotions.is_empty() {
            return Ok(items);
        }

        let mut claimed = claimed_skus(&items);

        for promotion in promotions {
            if !self.can_apply_promotion(Some(items.as_slice()), Some(promotion))? {
                debug!(promotion = ?promotion.key(), "multi item promotion does not apply");
                continue;
            }

            // A SKU may only be claimed by one bundle, e.g. "C + D" and "C + B" both want C.
            if promotion
                .required_items()
                .iter()
                .any(|requirement| claimed.contains(requirement.sku()))
            {
                debug!(
                    promotion = ?promotion.key(),
                    "bundle overlaps a sku that already has a promotion applied"
                );
                continue;
            }

            let skus: Vec<&str> = promotion
                .required_items()
                .iter()
                .map(RequiredItem::sku)
                .collect();

            info!(
                promotion = ?promotion.key(),
                skus = ?skus,
                price = %promotion.price(),
                "applying multi item promotion"
            );

            let mut price_bearing = true;

            for item in items.iter_mut().filter(|item| promotion.requires(item.sku())) {
                let total = bundle_line_price(item, promotion, price_bearing)?;

                item.apply_promotion_price(total, promotion.key());
                claimed.insert(item.sku().to_string());

                price_bearing = false;
            }
        }

        Ok(items)
    }
}

/// Excess quantity at unit price, plus the bundle price on the price-bearing line.
fn bundle_line_price<'a>(
    item: &LineItem<'a>,
    promotion: &Promotion<'a>,
    price_bearing: bool,
) -> Result<Money<'a, Currency>, PricingError> {
    let required_quantity = promotion
        .required_item(item.sku())
        .map_or(0, RequiredItem::quantity);

    let excess = item.quantity().saturating_sub(required_quantity);
    let excess_price = multiply(item.unit_price(), excess)?;

    if price_bearing {
        Ok(excess_price.add(promotion.price())?)
    } else {
        Ok(excess_price)
    }
}
