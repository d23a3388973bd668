//! Cart Fixtures

use rusty_money::Money;
use serde::Deserialize;

use crate::{
    cart::CartRequest,
    fixtures::{FixtureError, parse_price},
    items::LineItem,
};

/// Cart fixture from YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Cart lines; `null` or missing means the request has no item list
    #[serde(default)]
    pub items: Option<Vec<LineItemFixture>>,
}

/// Line item fixture from YAML
#[derive(Debug, Deserialize)]
pub struct LineItemFixture {
    /// SKU
    pub sku: String,

    /// Unit price (e.g. "50 GBP")
    pub unit_price: String,

    /// Quantity
    pub quantity: u32,

    /// Line arrives already claimed by an earlier promotion pass
    #[serde(default)]
    pub promotion_applied: bool,
}

impl TryFrom<LineItemFixture> for LineItem<'static> {
    type Error = FixtureError;

    fn try_from(fixture: LineItemFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.unit_price)?;

        let item = LineItem::new(
            fixture.sku,
            Money::from_minor(minor_units, currency),
            fixture.quantity,
        )?;

        Ok(if fixture.promotion_applied {
            item.with_promotion_applied()
        } else {
            item
        })
    }
}

impl TryFrom<CartFixture> for CartRequest<'static> {
    type Error = FixtureError;

    fn try_from(fixture: CartFixture) -> Result<Self, Self::Error> {
        let cart_items = fixture
            .items
            .map(|items| {
                items
                    .into_iter()
                    .map(LineItem::try_from)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(CartRequest { cart_items })
    }
}
