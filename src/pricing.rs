//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while calculating prices.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// An amount in minor units could not be represented.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Multiplies a price by a quantity in minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result does not fit in minor units.
pub fn multiply<'a>(
    price: Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor_units = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor_units, price.currency()))
}

/// Sums the final line totals of the given items.
///
/// # Errors
///
/// - [`PricingError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a>(items: &[LineItem<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = items.first().ok_or(PricingError::NoItems)?;

    let total = items.iter().try_fold(
        Money::from_minor(0, first.currency()),
        |acc, item| acc.add(item.total_price()),
    )?;

    Ok(total)
}

/// Sums the un-promoted list prices of the given items.
///
/// # Errors
///
/// - [`PricingError::NoItems`]: No items were provided.
/// - [`PricingError::Overflow`]: A line's list price could not be represented.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn list_price<'a>(items: &[LineItem<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = items.first().ok_or(PricingError::NoItems)?;

    items
        .iter()
        .try_fold(Money::from_minor(0, first.currency()), |acc, item| {
            Ok(acc.add(item.list_price()?)?)
        })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn multiply_scales_minor_units() -> TestResult {
        assert_eq!(
            multiply(Money::from_minor(1_550, GBP), 3)?,
            Money::from_minor(4_650, GBP)
        );
        assert_eq!(
            multiply(Money::from_minor(1_550, GBP), 0)?,
            Money::from_minor(0, GBP)
        );

        Ok(())
    }

    #[test]
    fn test_total_price() -> TestResult {
        let items = [
            LineItem::new("A", Money::from_minor(100, USD), 2)?,
            LineItem::new("B", Money::from_minor(200, USD), 1)?,
        ];

        assert_eq!(total_price(&items)?, Money::from_minor(400, USD));

        Ok(())
    }

    #[test]
    fn test_total_price_empty() {
        let items: [LineItem<'static>; 0] = [];

        assert!(matches!(total_price(&items), Err(PricingError::NoItems)));
    }

    #[test]
    fn total_price_rejects_mixed_currencies() -> TestResult {
        let items = [
            LineItem::new("A", Money::from_minor(100, GBP), 1)?,
            LineItem::new("B", Money::from_minor(100, USD), 1)?,
        ];

        assert!(matches!(total_price(&items), Err(PricingError::Money(_))));

        Ok(())
    }

    #[test]
    fn list_price_ignores_promotions() -> TestResult {
        let items = [
            LineItem::new("A", Money::from_minor(5_000, GBP), 3)?.with_promotion_applied(),
            LineItem::new("B", Money::from_minor(3_000, GBP), 1)?,
        ];

        assert_eq!(list_price(&items)?, Money::from_minor(18_000, GBP));

        Ok(())
    }
}
