//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    items::LineItem,
    pricing::{PricingError, list_price, total_price},
};

/// Errors related to cart construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A line's currency differs from the cart currency (index, line currency, cart currency).
    #[error("Item {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Wrapped price arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Incoming pricing request: the cart's line items, which may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartRequest<'a> {
    /// The cart's line items
    pub cart_items: Option<Vec<LineItem<'a>>>,
}

impl<'a> CartRequest<'a> {
    /// Create a request for the given items.
    pub fn new(items: impl Into<Vec<LineItem<'a>>>) -> Self {
        Self {
            cart_items: Some(items.into()),
        }
    }

    /// A request whose item list is absent.
    pub fn without_items() -> Self {
        Self::default()
    }
}

/// A priced cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'a Currency,
    total: Money<'a, Currency>,
}

impl<'a> Cart<'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Cart {
            items: Vec::new(),
            currency,
            total: Money::from_minor(0, currency),
        }
    }

    /// Create a cart from priced line items.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if a line is not priced in `currency`, or
    /// [`CartError::Pricing`] if the total cannot be computed.
    pub fn with_items(
        items: impl Into<Vec<LineItem<'a>>>,
        currency: &'a Currency,
    ) -> Result<Self, CartError> {
        let items = items.into();

        items.iter().enumerate().try_for_each(|(i, item)| {
            let item_currency = item.currency();
            if item_currency == currency {
                Ok(())
            } else {
                Err(CartError::CurrencyMismatch(
                    i,
                    item_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ))
            }
        })?;

        let total = if items.is_empty() {
            Money::from_minor(0, currency)
        } else {
            total_price(&items)?
        };

        Ok(Cart {
            items,
            currency,
            total,
        })
    }

    /// Sum of the final line totals.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Sum of the un-promoted line totals.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a list price cannot be represented.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.currency));
        }

        list_price(&self.items)
    }

    /// Amount saved by promotions (`subtotal - total`).
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the subtotal cannot be computed.
    pub fn savings(&self) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.subtotal()?.sub(self.total)?)
    }

    /// Line items in cart order
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Iterate over the line items.
    pub fn iter(&self) -> std::slice::Iter<'_, LineItem<'a>> {
        self.items.iter()
    }

    /// Consume the cart and return its line items.
    pub fn into_items(self) -> Vec<LineItem<'a>> {
        self.items
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

impl<'c, 'a> IntoIterator for &'c Cart<'a> {
    type Item = &'c LineItem<'a>;
    type IntoIter = std::slice::Iter<'c, LineItem<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
