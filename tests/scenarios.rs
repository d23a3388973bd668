//! Reference carts priced against the standard promotion set.
//!
//! Standard promotions: 3 of A for 130, 2 of B for 45, C + D for 30.
//! Unit prices: A 50, B 30, C 20, D 15.
//!
//! - Scenario A: 1 A, 1 B, 1 C. No promotion applies: 50 + 30 + 20 = 100.
//! - Scenario B: 5 A, 5 B, 1 C. A = 130 + 2 * 50 = 230, B = 2 * 45 + 30 = 120,
//!   C = 20, total 370.
//! - Scenario C: 3 A, 5 B, 1 C, 1 D. A = 130, B = 120, C + D = 30, total 280.

use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use promotion_engine::prelude::*;

fn fixture() -> Result<Fixture, FixtureError> {
    let mut fixture = Fixture::with_base_path(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures"));

    fixture.load_promotions("standard")?;

    Ok(fixture)
}

fn price(cart: &str, enabled: EnabledCategories) -> Result<Cart<'static>, Box<dyn std::error::Error>> {
    let fixture = fixture()?;
    let request = fixture.cart(cart)?;

    let service = CartService::new(fixture.into_catalog(), enabled);

    Ok(service.calculate_total_promotion_price(request)?)
}

fn line_total(cart: &Cart<'static>, sku: &str) -> Option<Money<'static, rusty_money::iso::Currency>> {
    cart.iter()
        .find(|item| item.sku() == sku)
        .map(LineItem::total_price)
}

#[test]
fn scenario_a_totals_100() -> TestResult {
    let cart = price("scenario_a", EnabledCategories::all())?;

    assert_eq!(cart.total(), Money::from_minor(10_000, GBP));
    assert!(cart.iter().all(|item| !item.promotion_applied()));

    Ok(())
}

#[test]
fn scenario_b_totals_370() -> TestResult {
    let cart = price("scenario_b", EnabledCategories::all())?;

    assert_eq!(line_total(&cart, "A"), Some(Money::from_minor(23_000, GBP)));
    assert_eq!(line_total(&cart, "B"), Some(Money::from_minor(12_000, GBP)));
    assert_eq!(line_total(&cart, "C"), Some(Money::from_minor(2_000, GBP)));
    assert_eq!(cart.total(), Money::from_minor(37_000, GBP));
    assert_eq!(cart.savings()?, Money::from_minor(5_000, GBP));

    Ok(())
}

#[test]
fn scenario_c_totals_280() -> TestResult {
    let cart = price("scenario_c", EnabledCategories::all())?;

    assert_eq!(line_total(&cart, "A"), Some(Money::from_minor(13_000, GBP)));
    assert_eq!(line_total(&cart, "B"), Some(Money::from_minor(12_000, GBP)));
    assert_eq!(line_total(&cart, "C"), Some(Money::from_minor(3_000, GBP)));
    assert_eq!(line_total(&cart, "D"), Some(Money::from_minor(0, GBP)));
    assert_eq!(cart.total(), Money::from_minor(28_000, GBP));

    Ok(())
}

#[test]
fn scenario_c_without_bundles_totals_285() -> TestResult {
    let cart = price(
        "scenario_c",
        EnabledCategories::none().with(PromotionCategory::SingleItem),
    )?;

    assert_eq!(cart.total(), Money::from_minor(28_500, GBP));

    Ok(())
}

#[test]
fn reversed_bundle_lines_put_price_on_first_cart_line() -> TestResult {
    let cart = price("bundle_reversed", EnabledCategories::all())?;

    // D is first in the cart, so D carries the bundle price plus its excess unit.
    assert_eq!(line_total(&cart, "D"), Some(Money::from_minor(4_500, GBP)));
    assert_eq!(line_total(&cart, "C"), Some(Money::from_minor(0, GBP)));
    assert_eq!(cart.total(), Money::from_minor(4_500, GBP));

    Ok(())
}

#[test]
fn invalid_cart_fixtures_report_validation_messages() -> TestResult {
    let cases: [(&str, &[&str]); 5] = [
        (
            "null",
            &["Cart Items Must be specified", "Cart must not be null"],
        ),
        ("no_items", &["Cart Items Must be specified"]),
        ("empty", &["Cart Items Must be specified"]),
        ("duplicate_skus", &["Cart Items must be grouped"]),
        (
            "invalid_lines",
            &[
                "Cart Item quantity must be greater than zero",
                "Cart Items must share a single currency",
            ],
        ),
    ];

    for (cart, expected) in cases {
        let fixture = fixture()?;
        let request = fixture.cart(cart)?;
        let service = CartService::new(fixture.into_catalog(), EnabledCategories::all());

        match service.calculate_total_promotion_price(request) {
            Err(CartServiceError::Validation(errors)) => {
                assert_eq!(errors.messages(), expected, "cart fixture {cart}");
            }
            other => return Err(format!("{cart}: expected validation failure, got {other:?}").into()),
        }
    }

    Ok(())
}

#[test]
fn receipt_lists_applied_promotions() -> TestResult {
    let fixture = fixture()?;
    let request = fixture.cart("scenario_c")?;
    let promotion_meta = fixture.promotion_meta_map().clone();

    let service = CartService::new(fixture.into_catalog(), EnabledCategories::all());
    let cart = service.calculate_total_promotion_price(request)?;

    let receipt = Receipt::from_cart(&cart)?;

    let mut out = Vec::new();
    receipt.write_to(&mut out, &cart, &promotion_meta)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("3 of A for 130"));
    assert!(output.contains("C + D for 30"));
    assert_eq!(receipt.total(), Money::from_minor(28_000, GBP));

    Ok(())
}
