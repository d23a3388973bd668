//! Promotion Catalog
//!
//! Source of promotion definitions for the pricing pipeline.

use rusty_money::{Money, iso::GBP};
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::promotions::{Promotion, PromotionCategory, PromotionKey, PromotionMeta, RequiredItem};

/// Catalog errors
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The catalog backend could not be read.
    #[error("promotion catalog unavailable: {0}")]
    Unavailable(String),
}

/// Provides the currently active promotions for a category.
#[cfg_attr(test, mockall::automock)]
pub trait PromotionCatalog {
    /// Returns the active promotions of `category`, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the catalog cannot be read.
    fn active_promotions(
        &self,
        category: PromotionCategory,
    ) -> Result<Vec<Promotion<'static>>, CatalogError>;
}

/// Insertion-ordered, in-memory promotion catalog.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    promotion_meta: SlotMap<PromotionKey, PromotionMeta>,
    promotions: Vec<Promotion<'static>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference promotion set: 3 of A for 130, 2 of B for 45 and C + D for 30.
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        catalog.insert(
            "3 of A for 130",
            Promotion::single_item(PromotionKey::default(), "A", 3, Money::from_minor(13_000, GBP)),
        );
        catalog.insert(
            "2 of B for 45",
            Promotion::single_item(PromotionKey::default(), "B", 2, Money::from_minor(4_500, GBP)),
        );
        catalog.insert(
            "C + D for 30",
            Promotion::multi_item(
                PromotionKey::default(),
                [RequiredItem::new("C", 1), RequiredItem::new("D", 1)],
                Money::from_minor(3_000, GBP),
            ),
        );

        catalog
    }

    /// Add a promotion under a newly assigned key and return the key.
    pub fn insert(&mut self, name: impl Into<String>, promotion: Promotion<'static>) -> PromotionKey {
        let key = self.promotion_meta.insert(PromotionMeta { name: name.into() });

        self.promotions.push(promotion.with_key(key));

        key
    }

    /// All promotions, active or not, in insertion order.
    pub fn promotions(&self) -> &[Promotion<'static>] {
        &self.promotions
    }

    /// Promotion metadata by key.
    pub fn promotion_meta(&self, key: PromotionKey) -> Option<&PromotionMeta> {
        self.promotion_meta.get(key)
    }

    /// The promotion metadata `SlotMap`
    pub fn promotion_meta_map(&self) -> &SlotMap<PromotionKey, PromotionMeta> {
        &self.promotion_meta
    }

    /// Number of promotions in the catalog
    pub fn len(&self) -> usize {
        self.promotions.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.promotions.is_empty()
    }
}

impl PromotionCatalog for InMemoryCatalog {
    fn active_promotions(
        &self,
        category: PromotionCategory,
    ) -> Result<Vec<Promotion<'static>>, CatalogError> {
        let promotions: Vec<Promotion<'static>> = self
            .promotions
            .iter()
            .filter(|promotion| promotion.is_active() && promotion.category() == category)
            .cloned()
            .collect();

        debug!(%category, count = promotions.len(), "loaded active promotions");

        Ok(promotions)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn insert_assigns_distinct_keys_and_names() {
        let mut catalog = InMemoryCatalog::new();

        let a = catalog.insert(
            "A deal",
            Promotion::single_item(PromotionKey::default(), "A", 3, Money::from_minor(130, GBP)),
        );
        let b = catalog.insert(
            "B deal",
            Promotion::single_item(PromotionKey::default(), "B", 2, Money::from_minor(45, GBP)),
        );

        assert_ne!(a, b);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.promotion_meta(a).map(|meta| meta.name.as_str()), Some("A deal"));
        assert_eq!(catalog.promotions().first().map(Promotion::key), Some(a));
    }

    #[test]
    fn active_promotions_filters_by_category_and_active() -> TestResult {
        let mut catalog = InMemoryCatalog::standard();

        catalog.insert(
            "Retired A deal",
            Promotion::single_item(PromotionKey::default(), "A", 2, Money::from_minor(90, GBP))
                .with_active(false),
        );

        let single = catalog.active_promotions(PromotionCategory::SingleItem)?;
        let multi = catalog.active_promotions(PromotionCategory::MultiItem)?;

        assert_eq!(single.len(), 2);
        assert!(single.iter().all(|p| p.is_active() && p.category() == PromotionCategory::SingleItem));
        assert_eq!(multi.len(), 1);
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn active_promotions_preserves_insertion_order() -> TestResult {
        let catalog = InMemoryCatalog::standard();

        let skus: Vec<String> = catalog
            .active_promotions(PromotionCategory::SingleItem)?
            .iter()
            .filter_map(|p| p.required_items().first().map(|r| r.sku().to_string()))
            .collect();

        assert_eq!(skus, ["A", "B"]);

        Ok(())
    }

    #[test]
    fn empty_catalog_has_no_promotions() -> TestResult {
        let catalog = InMemoryCatalog::new();

        assert!(catalog.is_empty());
        assert!(catalog.active_promotions(PromotionCategory::MultiItem)?.is_empty());

        Ok(())
    }
}
