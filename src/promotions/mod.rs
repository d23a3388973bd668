//! Promotions
//!
//! Promotion definitions as supplied by a catalog: a category, a fixed
//! promotion price and the ordered SKU quantities required to trigger it.

use std::{fmt, str::FromStr};

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Promotion metadata
#[derive(Debug, Default, Clone)]
pub struct PromotionMeta {
    /// Promotion name
    pub name: String,
}

/// Error returned when a promotion category name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown promotion category: {0}")]
pub struct UnknownCategory(pub String);

/// Promotion categories. Each category is handled by exactly one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionCategory {
    /// "Buy N of one SKU for a fixed price"
    SingleItem,

    /// "Buy a fixed bundle of distinct SKUs for a fixed price"
    MultiItem,
}

impl PromotionCategory {
    /// Every category, in pipeline order.
    pub const ALL: [PromotionCategory; 2] =
        [PromotionCategory::SingleItem, PromotionCategory::MultiItem];

    /// Configuration name of the category
    pub fn as_str(self) -> &'static str {
        match self {
            PromotionCategory::SingleItem => "SingleItem",
            PromotionCategory::MultiItem => "MultiItem",
        }
    }
}

impl fmt::Display for PromotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromotionCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SingleItem" | "single_item" => Ok(PromotionCategory::SingleItem),
            "MultiItem" | "MultipleItems" | "multi_item" => Ok(PromotionCategory::MultiItem),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// A SKU and the quantity of it a promotion requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredItem {
    sku: String,
    quantity: u32,
}

impl RequiredItem {
    /// Create a new required item.
    pub fn new(sku: impl Into<String>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }

    /// Required SKU
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Required quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A promotion definition.
#[derive(Debug, Clone)]
pub struct Promotion<'a> {
    key: PromotionKey,
    category: PromotionCategory,
    active: bool,
    price: Money<'a, Currency>,
    required_items: SmallVec<[RequiredItem; 4]>,
}

impl<'a> Promotion<'a> {
    /// Create a new, active promotion.
    pub fn new(
        key: PromotionKey,
        category: PromotionCategory,
        price: Money<'a, Currency>,
        required_items: impl IntoIterator<Item = RequiredItem>,
    ) -> Self {
        Self {
            key,
            category,
            active: true,
            price,
            required_items: required_items.into_iter().collect(),
        }
    }

    /// Create a single-item promotion: `quantity` of `sku` for `price`.
    pub fn single_item(
        key: PromotionKey,
        sku: impl Into<String>,
        quantity: u32,
        price: Money<'a, Currency>,
    ) -> Self {
        Self::new(
            key,
            PromotionCategory::SingleItem,
            price,
            [RequiredItem::new(sku, quantity)],
        )
    }

    /// Create a multi-item promotion over the given bundle.
    pub fn multi_item(
        key: PromotionKey,
        required_items: impl IntoIterator<Item = RequiredItem>,
        price: Money<'a, Currency>,
    ) -> Self {
        Self::new(key, PromotionCategory::MultiItem, price, required_items)
    }

    /// Set whether the promotion is active.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Replace the promotion key.
    #[must_use]
    pub(crate) fn with_key(mut self, key: PromotionKey) -> Self {
        self.key = key;
        self
    }

    /// Return the promotion key
    pub fn key(&self) -> PromotionKey {
        self.key
    }

    /// Return the promotion category
    pub fn category(&self) -> PromotionCategory {
        self.category
    }

    /// Return whether the promotion is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fixed price charged when the full condition is met
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Required items, in definition order
    pub fn required_items(&self) -> &[RequiredItem] {
        &self.required_items
    }

    /// Look up the required entry for a SKU.
    pub fn required_item(&self, sku: &str) -> Option<&RequiredItem> {
        self.required_items.iter().find(|item| item.sku() == sku)
    }

    /// True if `sku` is one of the required SKUs.
    pub fn requires(&self, sku: &str) -> bool {
        self.required_item(sku).is_some()
    }
}
