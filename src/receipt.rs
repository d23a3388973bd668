//! Receipt

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use thiserror::Error;

use crate::{
    cart::Cart,
    items::LineItem,
    pricing::PricingError,
    promotions::{PromotionKey, PromotionMeta},
};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error calculating the cart subtotal.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The receipt could not be written.
    #[error("failed to write receipt: {0}")]
    Io(#[from] io::Error),
}

/// Final receipt for a priced cart.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Indexes of cart lines that were charged at full price
    full_price_items: SmallVec<[usize; 10]>,

    /// Promotion that priced each line, in cart order
    line_promotions: SmallVec<[Option<PromotionKey>; 10]>,

    /// Total cost before any promotion
    subtotal: Money<'a, Currency>,

    /// Total amount paid after promotions
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'a Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    pub fn new(
        full_price_items: SmallVec<[usize; 10]>,
        line_promotions: SmallVec<[Option<PromotionKey>; 10]>,
        subtotal: Money<'a, Currency>,
        total: Money<'a, Currency>,
        currency: &'a Currency,
    ) -> Self {
        Self {
            full_price_items,
            line_promotions,
            subtotal,
            total,
            currency,
        }
    }

    /// Build a receipt from a priced cart.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the cart subtotal cannot be calculated.
    pub fn from_cart(cart: &Cart<'a>) -> Result<Self, ReceiptError> {
        let full_price_items = cart
            .iter()
            .enumerate()
            .filter(|(_, item)| !item.promotion_applied())
            .map(|(idx, _)| idx)
            .collect();

        let line_promotions = cart.iter().map(LineItem::promotion).collect();

        Ok(Self::new(
            full_price_items,
            line_promotions,
            cart.subtotal()?,
            cart.total(),
            cart.currency(),
        ))
    }

    /// Total cost before any promotion
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount paid for all items
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Calculate the savings made by applying promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Savings as percent points of the subtotal, rounded to 2 places.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Decimal, MoneyError> {
        let savings = Decimal::from(self.savings()?.to_minor_units());
        let subtotal = Decimal::from(self.subtotal.to_minor_units());

        Ok((savings * Decimal::ONE_HUNDRED)
            .checked_div(subtotal)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2))
    }

    /// Indexes of lines charged at full price
    pub fn full_price_items(&self) -> &[usize] {
        &self.full_price_items
    }

    /// The promotion that priced the line at `item_idx`, if any.
    pub fn promotion_for_item(&self, item_idx: usize) -> Option<PromotionKey> {
        self.line_promotions.get(item_idx).copied().flatten()
    }

    /// Currency of the receipt
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Writes the line table followed by the subtotal, total and savings summary.
    ///
    /// Lines priced by a promotion show the final price, the amount saved and
    /// the promotion name from `promotion_meta`.
    ///
    /// # Errors
    ///
    /// Returns an error if a line price cannot be computed or the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        cart: &Cart<'_>,
        promotion_meta: &SlotMap<PromotionKey, PromotionMeta>,
    ) -> Result<(), ReceiptError> {
        let mut lines = Builder::default();

        lines.push_record([
            "SKU",
            "Qty",
            "Unit Price",
            "List Price",
            "Final Price",
            "Savings",
            "Promotion",
        ]);

        for (idx, item) in cart.iter().enumerate() {
            lines.push_record(self.line_record(idx, item, promotion_meta)?);
        }

        let mut lines = lines.build();
        lines
            .with(Style::rounded())
            .modify(Columns::new(1..6), Alignment::right());

        let mut summary = Builder::default();
        summary.push_record(["Subtotal".to_string(), self.subtotal.to_string()]);
        summary.push_record(["Total".to_string(), self.total.to_string()]);
        summary.push_record([
            "Savings".to_string(),
            format!("{} ({:.2}%)", self.savings()?, self.savings_percent()?),
        ]);

        let mut summary = summary.build();
        summary
            .with(Style::blank())
            .modify(Columns::last(), Alignment::right());

        writeln!(out, "{lines}")?;
        writeln!(out, "{summary}")?;

        Ok(())
    }

    fn line_record(
        &self,
        idx: usize,
        item: &LineItem<'_>,
        promotion_meta: &SlotMap<PromotionKey, PromotionMeta>,
    ) -> Result<[String; 7], ReceiptError> {
        let list_price = item.list_price()?;

        let (final_price, savings, promotion) = if item.promotion_applied() {
            let name = self
                .promotion_for_item(idx)
                .and_then(|key| promotion_meta.get(key))
                .map_or("<unknown>", |meta| meta.name.as_str());

            (
                item.total_price().to_string(),
                list_price.sub(item.total_price())?.to_string(),
                name.to_string(),
            )
        } else {
            (list_price.to_string(), String::new(), String::new())
        };

        Ok([
            item.sku().to_string(),
            item.quantity().to_string(),
            item.unit_price().to_string(),
            list_price.to_string(),
            final_price,
            savings,
            promotion,
        ])
    }
}
