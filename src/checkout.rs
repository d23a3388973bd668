//! Checkout
//!
//! Cart pricing façade: validates an incoming [`CartRequest`], runs the
//! promotion pipeline and returns the priced [`Cart`].

use std::fmt;

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, CartError, CartRequest},
    catalog::PromotionCatalog,
    items::LineItem,
    orchestrator::{EnabledCategories, OrchestratorError, PromotionOrchestrator},
    pricing::PricingError,
};

/// A single violated cart rule.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The cart has no items, or its item list is absent.
    #[error("Cart Items Must be specified")]
    ItemsRequired,

    /// No cart was supplied.
    #[error("Cart must not be null")]
    CartRequired,

    /// The same SKU appears on more than one line.
    #[error("Cart Items must be grouped")]
    ItemsNotGrouped,

    /// A line has a zero quantity.
    #[error("Cart Item quantity must be greater than zero")]
    ZeroQuantity,

    /// A line has a negative unit price.
    #[error("Cart Item unit price must not be negative")]
    NegativeUnitPrice,

    /// Lines are priced in more than one currency.
    #[error("Cart Items must share a single currency")]
    MixedCurrencies,
}

/// Every rule a cart violated, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// The violated rules
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Human readable message per violated rule.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// True if the cart violated `error`.
    pub fn contains(&self, error: ValidationError) -> bool {
        self.0.contains(&error)
    }

    /// Check if no rule was violated.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push_if(&mut self, violated: bool, error: ValidationError) {
        if violated {
            self.0.push(error);
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Cart service errors
#[derive(Debug, Error, PartialEq)]
pub enum CartServiceError {
    /// The cart failed validation; promotions were not evaluated.
    #[error("invalid cart: {0}")]
    Validation(ValidationErrors),

    /// Wrapped orchestrator error.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    /// Wrapped cart construction error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Check a request against every cart rule.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every violated rule.
pub fn validate_cart(cart: Option<&CartRequest<'_>>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(cart) = cart else {
        errors.push_if(true, ValidationError::ItemsRequired);
        errors.push_if(true, ValidationError::CartRequired);

        return Err(errors);
    };

    let items = cart.cart_items.as_deref().unwrap_or_default();

    errors.push_if(items.is_empty(), ValidationError::ItemsRequired);
    errors.push_if(has_duplicate_skus(items), ValidationError::ItemsNotGrouped);
    errors.push_if(
        items.iter().any(|item| item.quantity() == 0),
        ValidationError::ZeroQuantity,
    );
    errors.push_if(
        items.iter().any(|item| item.unit_price().is_negative()),
        ValidationError::NegativeUnitPrice,
    );
    errors.push_if(
        items
            .first()
            .is_some_and(|first| items.iter().any(|item| item.currency() != first.currency())),
        ValidationError::MixedCurrencies,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn has_duplicate_skus(items: &[LineItem<'_>]) -> bool {
    let mut seen = FxHashSet::default();

    !items.iter().all(|item| seen.insert(item.sku()))
}

/// Prices carts against a promotion catalog.
#[derive(Debug)]
pub struct CartService<C> {
    catalog: C,
    orchestrator: PromotionOrchestrator,
    enabled: EnabledCategories,
}

impl<C: PromotionCatalog> CartService<C> {
    /// Create a service over `catalog` with the given promotion categories enabled.
    pub fn new(catalog: C, enabled: EnabledCategories) -> Self {
        Self {
            catalog,
            orchestrator: PromotionOrchestrator::new(),
            enabled,
        }
    }

    /// The promotion catalog
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Categories this service applies
    pub fn enabled(&self) -> EnabledCategories {
        self.enabled
    }

    /// Validate `cart`, apply the enabled promotions and return the priced cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartServiceError::Validation`] if the cart breaks any cart rule, in which
    /// case no promotion is evaluated; otherwise propagates pipeline errors.
    #[tracing::instrument(name = "checkout.calculate_total_promotion_price", skip_all)]
    pub fn calculate_total_promotion_price<'a>(
        &self,
        cart: Option<CartRequest<'a>>,
    ) -> Result<Cart<'a>, CartServiceError> {
        if let Err(errors) = validate_cart(cart.as_ref()) {
            warn!(errors = %errors, "cart failed validation");

            return Err(CartServiceError::Validation(errors));
        }

        let items = cart.and_then(|cart| cart.cart_items).unwrap_or_default();

        let currency = items
            .first()
            .map(LineItem::currency)
            .ok_or(PricingError::NoItems)?;

        let items =
            self.orchestrator
                .apply_promotion_strategies(items, self.enabled, &self.catalog)?;

        let cart = Cart::with_items(items, currency)?;

        info!(
            lines = cart.len(),
            total = %cart.total(),
            "priced cart"
        );

        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{
        Money,
        iso::{self, Currency},
    };
    use testresult::TestResult;

    use crate::catalog::{InMemoryCatalog, MockPromotionCatalog};

    use super::*;

    fn gbp(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, iso::GBP)
    }

    fn line(sku: &str, minor: i64, quantity: u32) -> Result<LineItem<'static>, PricingError> {
        LineItem::new(sku, gbp(minor), quantity)
    }

    fn untouched_catalog() -> MockPromotionCatalog {
        let mut catalog = MockPromotionCatalog::new();
        catalog.expect_active_promotions().never();
        catalog
    }

    fn validation_messages(result: &Result<Cart<'_>, CartServiceError>) -> Vec<String> {
        match result {
            Err(CartServiceError::Validation(errors)) => errors.messages(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn null_cart_reports_both_messages() {
        let service = CartService::new(untouched_catalog(), EnabledCategories::all());

        let messages = validation_messages(&service.calculate_total_promotion_price(None));

        assert_eq!(
            messages,
            ["Cart Items Must be specified", "Cart must not be null"]
        );
    }

    #[test]
    fn absent_and_empty_items_are_rejected() {
        let service = CartService::new(untouched_catalog(), EnabledCategories::all());

        for request in [CartRequest::without_items(), CartRequest::new(Vec::new())] {
            let messages = validation_messages(&service.calculate_total_promotion_price(Some(request)));

            assert_eq!(messages, ["Cart Items Must be specified"]);
        }
    }

    #[test]
    fn duplicate_skus_are_rejected() -> TestResult {
        let service = CartService::new(untouched_catalog(), EnabledCategories::all());
        let request = CartRequest::new([line("A", 5_000, 1)?, line("B", 3_000, 1)?, line("A", 5_000, 2)?]);

        let messages = validation_messages(&service.calculate_total_promotion_price(Some(request)));

        assert_eq!(messages, ["Cart Items must be grouped"]);

        Ok(())
    }

    #[test]
    fn every_violated_rule_is_reported_in_order() -> TestResult {
        let request = CartRequest::new([
            line("A", 5_000, 0)?,
            line("A", -100, 1)?,
            LineItem::new("B", Money::from_minor(3_000, iso::USD), 1)?,
        ]);

        let Err(errors) = validate_cart(Some(&request)) else {
            return Err("expected validation errors".into());
        };

        assert_eq!(
            errors.errors(),
            [
                ValidationError::ItemsNotGrouped,
                ValidationError::ZeroQuantity,
                ValidationError::NegativeUnitPrice,
                ValidationError::MixedCurrencies,
            ]
        );
        assert!(!errors.contains(ValidationError::ItemsRequired));

        Ok(())
    }

    #[test]
    fn validation_errors_display_joins_messages() {
        let errors = ValidationErrors(vec![
            ValidationError::ItemsRequired,
            ValidationError::CartRequired,
        ]);

        assert_eq!(
            errors.to_string(),
            "Cart Items Must be specified; Cart must not be null"
        );
    }

    #[test]
    fn valid_cart_passes_validation() -> TestResult {
        let request = CartRequest::new([line("A", 5_000, 1)?, line("B", 3_000, 1)?]);

        assert_eq!(validate_cart(Some(&request)), Ok(()));

        Ok(())
    }

    #[test]
    fn scenario_a_has_no_promotions_applied() -> TestResult {
        let service = CartService::new(InMemoryCatalog::standard(), EnabledCategories::all());
        let request = CartRequest::new([line("A", 5_000, 1)?, line("B", 3_000, 1)?, line("C", 2_000, 1)?]);

        let cart = service.calculate_total_promotion_price(Some(request))?;

        assert_eq!(cart.total(), gbp(10_000));
        assert_eq!(cart.savings()?, gbp(0));

        Ok(())
    }

    #[test]
    fn scenario_b_applies_single_item_promotions() -> TestResult {
        let service = CartService::new(InMemoryCatalog::standard(), EnabledCategories::all());
        let request = CartRequest::new([line("A", 5_000, 5)?, line("B", 3_000, 5)?, line("C", 2_000, 1)?]);

        let cart = service.calculate_total_promotion_price(Some(request))?;

        assert_eq!(cart.total(), gbp(37_000));
        assert_eq!(cart.subtotal()?, gbp(42_000));

        Ok(())
    }

    #[test]
    fn scenario_c_applies_both_categories() -> TestResult {
        let service = CartService::new(InMemoryCatalog::standard(), EnabledCategories::all());
        let request = CartRequest::new([
            line("A", 5_000, 3)?,
            line("B", 3_000, 5)?,
            line("C", 2_000, 1)?,
            line("D", 1_500, 1)?,
        ]);

        let cart = service.calculate_total_promotion_price(Some(request))?;

        assert_eq!(cart.total(), gbp(28_000));

        Ok(())
    }

    #[test]
    fn disabled_categories_leave_list_prices() -> TestResult {
        let service = CartService::new(InMemoryCatalog::standard(), EnabledCategories::none());
        let request = CartRequest::new([line("A", 5_000, 3)?, line("C", 2_000, 1)?, line("D", 1_500, 1)?]);

        let cart = service.calculate_total_promotion_price(Some(request))?;

        assert_eq!(cart.total(), gbp(18_500));
        assert!(cart.iter().all(|item| !item.promotion_applied()));

        Ok(())
    }

    #[test]
    fn priced_lines_resolve_to_catalog_promotion_names() -> TestResult {
        let service = CartService::new(InMemoryCatalog::standard(), EnabledCategories::all());
        let request = CartRequest::new([line("A", 5_000, 3)?, line("E", 1_000, 1)?]);

        let cart = service.calculate_total_promotion_price(Some(request))?;

        let names: Vec<Option<&str>> = cart
            .iter()
            .map(|item| {
                item.promotion()
                    .and_then(|key| service.catalog().promotion_meta(key))
                    .map(|meta| meta.name.as_str())
            })
            .collect();

        assert_eq!(names, [Some("3 of A for 130"), None]);
        assert_eq!(service.enabled(), EnabledCategories::all());

        Ok(())
    }

    #[test]
    fn enabled_categories_are_queried_once_each() -> TestResult {
        let mut catalog = MockPromotionCatalog::new();
        catalog
            .expect_active_promotions()
            .times(2)
            .returning(|_| Ok(Vec::new()));

        let service = CartService::new(catalog, EnabledCategories::all());
        let request = CartRequest::new([line("A", 5_000, 1)?]);

        let cart = service.calculate_total_promotion_price(Some(request))?;

        assert_eq!(cart.total(), gbp(5_000));
        assert_eq!(service.enabled(), EnabledCategories::all());

        Ok(())
    }
}
