//! Promotion engine prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartRequest},
    catalog::{CatalogError, InMemoryCatalog, PromotionCatalog},
    checkout::{CartService, CartServiceError, ValidationError, ValidationErrors, validate_cart},
    fixtures::{Fixture, FixtureError},
    items::LineItem,
    orchestrator::{EnabledCategories, OrchestratorError, PromotionOrchestrator},
    pricing::PricingError,
    promotions::{
        Promotion, PromotionCategory, PromotionKey, PromotionMeta, RequiredItem, UnknownCategory,
    },
    receipt::{Receipt, ReceiptError},
    strategies::{MultiItemStrategy, PromotionStrategy, SingleItemStrategy, StrategyError},
};
