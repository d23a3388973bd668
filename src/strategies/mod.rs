//! Promotion Strategies
//!
//! Each strategy evaluates one [`PromotionCategory`] against a cart's line
//! items. Strategies take the items by value and return the re-priced items;
//! a line claimed by any promotion is never re-priced within the same pass.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::PricingError,
    promotions::{Promotion, PromotionCategory},
};

pub mod multi_item;
pub mod single_item;

pub use multi_item::MultiItemStrategy;
pub use single_item::SingleItemStrategy;

/// Strategy Errors
#[derive(Debug, Error, PartialEq)]
pub enum StrategyError {
    /// A required argument was absent. This is a caller bug, not a pricing outcome.
    #[error("argument `{parameter}` must be provided")]
    MissingArgument {
        /// Name of the absent parameter
        parameter: &'static str,
    },

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Capability shared by every promotion category evaluator.
pub trait PromotionStrategy: std::fmt::Debug {
    /// The category this strategy evaluates.
    fn category(&self) -> PromotionCategory;

    /// Determine whether `promotion` can be applied to `items`.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::MissingArgument`] if either argument is `None`.
    fn can_apply_promotion(
        &self,
        items: Option<&[LineItem<'_>]>,
        promotion: Option<&Promotion<'_>>,
    ) -> Result<bool, StrategyError>;

    /// Apply `promotions`, in order, to `items` and return the re-priced items.
    ///
    /// Empty items or empty promotions return the items unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::MissingArgument`] if either argument is `None`, or
    /// [`StrategyError::Pricing`] if a promotion price cannot be computed.
    fn apply_promotions<'a>(
        &self,
        items: Option<Vec<LineItem<'a>>>,
        promotions: Option<&[Promotion<'a>]>,
    ) -> Result<Vec<LineItem<'a>>, StrategyError>;
}

/// Unwrap an argument or report it as missing.
pub(crate) fn required<T>(value: Option<T>, parameter: &'static str) -> Result<T, StrategyError> {
    value.ok_or(StrategyError::MissingArgument { parameter })
}

/// Checks shared by every category before any item matching.
pub(crate) fn is_candidate(
    items: &[LineItem<'_>],
    promotion: &Promotion<'_>,
    category: PromotionCategory,
) -> bool {
    !items.is_empty()
        && promotion.is_active()
        && promotion.category() == category
        && !promotion.required_items().is_empty()
        && promotion
            .required_items()
            .iter()
            .all(|required| required.quantity() > 0)
}

/// SKUs already claimed before this pass started.
pub(crate) fn claimed_skus(items: &[LineItem<'_>]) -> FxHashSet<String> {
    items
        .iter()
        .filter(|item| item.promotion_applied())
        .map(|item| item.sku().to_string())
        .collect()
}

/// First line in cart order with the given SKU.
pub(crate) fn find_item<'i, 'a>(items: &'i [LineItem<'a>], sku: &str) -> Option<&'i LineItem<'a>> {
    items.iter().find(|item| item.sku() == sku)
}
