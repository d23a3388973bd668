//! Items

use rusty_money::{Money, iso::Currency};

use crate::{
    pricing::{PricingError, multiply},
    promotions::PromotionKey,
};

/// A single SKU's quantity and pricing within a cart.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    sku: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    total_price: Money<'a, Currency>,
    promotion_applied: bool,
    promotion: Option<PromotionKey>,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item priced at `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total cannot be represented.
    pub fn new(
        sku: impl Into<String>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, PricingError> {
        let total_price = multiply(unit_price, quantity)?;

        Ok(Self {
            sku: sku.into(),
            unit_price,
            quantity,
            total_price,
            promotion_applied: false,
            promotion: None,
        })
    }

    /// Marks the line as already claimed by a promotion.
    #[must_use]
    pub fn with_promotion_applied(mut self) -> Self {
        self.promotion_applied = true;
        self
    }

    /// Returns the SKU
    pub fn sku(&self) -> &str {
        &self.sku
    }

    /// Returns the unit price
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the line total after any promotion
    pub fn total_price(&self) -> Money<'a, Currency> {
        self.total_price
    }

    /// Returns true once a promotion has claimed this line.
    pub fn promotion_applied(&self) -> bool {
        self.promotion_applied
    }

    /// Key of the promotion that priced this line, if it came from a catalog.
    pub fn promotion(&self) -> Option<PromotionKey> {
        self.promotion
    }

    /// Returns the currency of the unit price
    pub fn currency(&self) -> &'a Currency {
        self.unit_price.currency()
    }

    /// The un-promoted line total (`unit_price * quantity`).
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total cannot be represented.
    pub fn list_price(&self) -> Result<Money<'a, Currency>, PricingError> {
        multiply(self.unit_price, self.quantity)
    }

    /// Overwrites the line total and claims the line for `promotion`.
    pub(crate) fn apply_promotion_price(
        &mut self,
        total_price: Money<'a, Currency>,
        promotion: PromotionKey,
    ) {
        self.total_price = total_price;
        self.promotion_applied = true;
        self.promotion = Some(promotion);
    }
}
