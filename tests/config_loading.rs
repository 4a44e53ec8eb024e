//! Integration tests for loading bump configuration from disk.
//!
//! Malformed condition descriptors are skipped, never fatal: a bump whose conditions all fail to
//! build is registered empty and hidden, while its neighbours still display.

use std::fs;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::GBP};
use testresult::TestResult;

use order_bumps::prelude::*;

const CONFIG: &str = r"
logic: AND
bumps:
  - id: 10
    name: Broken Conditions
    conditions:
      - { type: cart_weight, value: 5 }
      - { type: cart_total }
      - just a string
    products: [1]

  - id: 11
    name: Mixed Conditions
    conditions:
      - { type: cart_total, value: 5 }
      - { type: cart_total, value: plenty }
    products: [1]

  - id: 12
    name: Nested Group
    display_location: before_payment
    layout: grid
    conditions:
      - logic: or
        conditions:
          - { type: cart_subtotal, value: 100 }
          - { type: user_logged_in, value: false }
    products:
      - { id: 1, discount_type: fixed, discount: 1.5, quantity: 3 }
";

fn cart(total_minor: i64) -> CartSnapshot<'static> {
    CartSnapshot::empty(GBP)
        .with_total(Money::from_minor(total_minor, GBP))
        .with_subtotal(Money::from_minor(total_minor, GBP))
        .with_item_count(1)
}

#[test]
fn malformed_conditions_do_not_stop_loading() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bumps.yml");

    fs::write(&path, CONFIG)?;

    let bumps = OrderBumps::load(&path)?;

    assert_eq!(bumps.bumps().len(), 3);
    assert_eq!(bumps.default_logic(), Logic::And);

    // Nothing in bump 10 builds, bump 11 keeps its valid threshold.
    assert!(bumps.registry().get(BumpId(10)).is_empty());
    assert_eq!(
        bumps.registry().get(BumpId(11)),
        &[Condition::CartTotalAtLeast(Decimal::from(5))]
    );

    let displayed: Vec<BumpId> = bumps
        .placements(&cart(500))
        .iter()
        .map(|placement| placement.bump)
        .collect();

    assert_eq!(displayed, vec![BumpId(11)]);

    Ok(())
}

#[test]
fn nested_group_uses_its_own_logic() -> TestResult {
    let bumps = OrderBumps::from_config(BumpsConfig::from_yaml(CONFIG)?)?;

    assert!(!bumps.should_display(BumpId(12), &cart(9_999)));
    assert!(bumps.should_display(BumpId(12), &cart(10_000)));
    assert!(bumps.should_display(BumpId(12), &cart(0).with_logged_in(true)));

    let placement = bumps
        .placements(&cart(10_000))
        .into_iter()
        .find(|placement| placement.bump == BumpId(12))
        .ok_or("bump 12 should display")?;

    assert_eq!(placement.location, DisplayLocation::BeforePayment);
    assert_eq!(placement.layout, Layout::Grid);

    Ok(())
}

#[test]
fn malformed_nested_child_leaves_the_group_gating() -> TestResult {
    let bumps = OrderBumps::from_config(BumpsConfig::from_yaml(
        r"
bumps:
  - id: 20
    conditions:
      - { type: cart_total, value: 5 }
      - logic: AND
        conditions:
          - { type: cart_item_count, value: 3 }
          - { type: cart_total, value: [1, 2] }
    products: [1]
",
    )?)?;

    let conditions = bumps.registry().get(BumpId(20));

    assert_eq!(conditions.len(), 2);
    assert!(matches!(
        conditions.get(1),
        Some(Condition::Composite(group)) if group.len() == 1
    ));

    // The surviving nested threshold still needs three items.
    assert!(!bumps.should_display(BumpId(20), &cart(500)));
    assert!(bumps.should_display(BumpId(20), &cart(500).with_item_count(3)));

    Ok(())
}

#[test]
fn detailed_products_carry_discount_and_quantity() -> TestResult {
    let bumps = OrderBumps::from_config(BumpsConfig::from_yaml(CONFIG)?)?;

    let bump = bumps.bump(BumpId(12)).ok_or("bump 12 should be configured")?;

    assert_eq!(
        bump.products,
        vec![
            BumpProduct::new(ProductId(1))
                .with_discount(BumpDiscount::fixed(Decimal::new(15, 1)))
                .with_quantity(3)
        ]
    );

    Ok(())
}

#[test]
fn reloading_builds_a_fresh_registry() -> TestResult {
    let first = OrderBumps::from_config(BumpsConfig::from_yaml(CONFIG)?)?;
    let second = OrderBumps::from_config(BumpsConfig::from_yaml(
        "bumps:\n  - id: 11\n    conditions:\n      - { type: user_logged_in, value: true }\n",
    )?)?;

    assert_eq!(first.registry().len(), 3);
    assert_eq!(second.registry().len(), 1);
    assert_eq!(second.registry().get(BumpId(11)), &[Condition::UserLoggedIn]);

    Ok(())
}

#[test]
fn unreadable_document_is_an_error() {
    assert!(matches!(
        BumpsConfig::from_yaml("bumps:\n  - name: missing id\n"),
        Err(ConfigError::Yaml(_))
    ));
}
