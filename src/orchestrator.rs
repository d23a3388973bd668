//! Promotion Orchestrator
//!
//! Runs the enabled promotion strategies over a cart in a fixed order:
//! single-item promotions first, then multi-item bundles. A line priced by
//! the single-item stage is never re-claimed by the multi-item stage.

use std::{fmt, str::FromStr};

use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

use crate::{
    catalog::{CatalogError, PromotionCatalog},
    items::LineItem,
    promotions::{PromotionCategory, UnknownCategory},
    strategies::{MultiItemStrategy, PromotionStrategy, SingleItemStrategy, StrategyError},
};

/// Orchestrator errors
#[derive(Debug, Error, PartialEq)]
pub enum OrchestratorError {
    /// Wrapped catalog lookup error.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A strategy failed while applying promotions.
    #[error("{category} strategy failed: {source}")]
    Strategy {
        /// Category of the failing strategy
        category: PromotionCategory,

        /// The underlying strategy error
        source: StrategyError,
    },
}

/// The set of promotion categories enabled for a pricing call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnabledCategories {
    single_item: bool,
    multi_item: bool,
}

impl EnabledCategories {
    /// No categories enabled; carts pass through unchanged.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every category enabled.
    pub fn all() -> Self {
        Self::from_iter(PromotionCategory::ALL)
    }

    /// Enable one more category.
    #[must_use]
    pub fn with(mut self, category: PromotionCategory) -> Self {
        match category {
            PromotionCategory::SingleItem => self.single_item = true,
            PromotionCategory::MultiItem => self.multi_item = true,
        }

        self
    }

    /// True if `category` is enabled.
    pub fn contains(self, category: PromotionCategory) -> bool {
        match category {
            PromotionCategory::SingleItem => self.single_item,
            PromotionCategory::MultiItem => self.multi_item,
        }
    }

    /// True if no category is enabled.
    pub fn is_empty(self) -> bool {
        !self.single_item && !self.multi_item
    }

    /// Enabled categories in pipeline order.
    pub fn categories(self) -> impl Iterator<Item = PromotionCategory> {
        PromotionCategory::ALL
            .into_iter()
            .filter(move |category| self.contains(*category))
    }
}

impl FromIterator<PromotionCategory> for EnabledCategories {
    fn from_iter<I: IntoIterator<Item = PromotionCategory>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// Parses a comma separated list such as `SingleItem,MultiItem`. An empty string enables nothing.
impl FromStr for EnabledCategories {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::parse::<PromotionCategory>)
            .collect()
    }
}

impl fmt::Display for EnabledCategories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: SmallVec<[&str; 2]> = self.categories().map(PromotionCategory::as_str).collect();

        f.write_str(&names.join(","))
    }
}

/// Fixed two-stage promotion pipeline.
#[derive(Debug)]
pub struct PromotionOrchestrator {
    strategies: SmallVec<[Box<dyn PromotionStrategy + Send + Sync>; 2]>,
}

impl PromotionOrchestrator {
    /// Create the orchestrator with the single-item stage ahead of the multi-item stage.
    pub fn new() -> Self {
        let mut strategies: SmallVec<[Box<dyn PromotionStrategy + Send + Sync>; 2]> =
            SmallVec::new();

        strategies.push(Box::new(SingleItemStrategy::new()));
        strategies.push(Box::new(MultiItemStrategy::new()));

        Self { strategies }
    }

    /// Categories in the order their strategies run.
    pub fn stage_order(&self) -> impl Iterator<Item = PromotionCategory> + '_ {
        self.strategies.iter().map(|strategy| strategy.category())
    }

    /// Apply every enabled strategy, in pipeline order, to `items`.
    ///
    /// # Errors
    ///
    /// Returns an [`OrchestratorError`] if the catalog cannot be read or a strategy fails.
    pub fn apply_promotion_strategies<'a>(
        &self,
        items: Vec<LineItem<'a>>,
        enabled: EnabledCategories,
        catalog: &dyn PromotionCatalog,
    ) -> Result<Vec<LineItem<'a>>, OrchestratorError> {
        if enabled.is_empty() {
            info!("No promotion categories are enabled.");
            return Ok(items);
        }

        let mut items = items;

        for strategy in &self.strategies {
            let category = strategy.category();

            if !enabled.contains(category) {
                continue;
            }

            info!("Applying {category} promotion strategy.");

            let promotions = catalog.active_promotions(category)?;

            items = strategy
                .apply_promotions(Some(items), Some(promotions.as_slice()))
                .map_err(|source| OrchestratorError::Strategy { category, source })?;
        }

        Ok(items)
    }
}

impl Default for PromotionOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
