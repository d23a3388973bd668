//! Single Item Strategy
//!
//! Bulk discounts on exactly one SKU, e.g. "3 of A for 130". Every complete
//! lot of the required quantity is charged the promotion price and the
//! remainder is charged at unit price.

use rusty_money::{Money, iso::Currency};
use tracing::{debug, info};

use crate::{
    items::LineItem,
    pricing::{PricingError, multiply},
    promotions::{Promotion, PromotionCategory, RequiredItem},
    strategies::{
        PromotionStrategy, StrategyError, claimed_skus, find_item, is_candidate, required,
    },
};

/// Evaluator for [`PromotionCategory::SingleItem`] promotions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleItemStrategy;

impl SingleItemStrategy {
    /// Create a new single item strategy.
    pub fn new() -> Self {
        Self
    }
}

impl PromotionStrategy for SingleItemStrategy {
    fn category(&self) -> PromotionCategory {
        PromotionCategory::SingleItem
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

        let Some(requirement) = promotion.required_items().first() else {
            return Ok(false);
        };

        Ok(find_item(items, requirement.sku())
            .is_some_and(|item| item.quantity() >= requirement.quantity()))
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
                debug!(promotion = ?promotion.key(), "single item promotion does not apply");
                continue;
            }

            let Some(requirement) = promotion.required_items().first() else {
                continue;
            };

            if claimed.contains(requirement.sku()) {
                debug!(
                    promotion = ?promotion.key(),
                    sku = requirement.sku(),
                    "sku already has a promotion applied"
                );
                continue;
            }

            let Some(item) = items
                .iter_mut()
                .find(|item| item.sku() == requirement.sku())
            else {
                continue;
            };

            let total = bulk_price(item, promotion.price(), requirement)?;

            info!(
                promotion = ?promotion.key(),
                sku = item.sku(),
                quantity = item.quantity(),
                total = %total,
                "applying single item promotion"
            );

            item.apply_promotion_price(total, promotion.key());
            claimed.insert(requirement.sku().to_string());
        }

        Ok(items)
    }
}

/// `price * lots + unit_price * remainder` for one line.
fn bulk_price<'a>(
    item: &LineItem<'a>,
    price: Money<'a, Currency>,
    requirement: &RequiredItem,
) -> Result<Money<'a, Currency>, PricingError> {
    let lots = item.quantity() / requirement.quantity();
    let remainder = item.quantity() % requirement.quantity();

    Ok(multiply(price, lots)?.add(multiply(item.unit_price(), remainder)?)?)
}
