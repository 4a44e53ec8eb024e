//! Display Conditions
//!
//! Boolean predicates over cart state that decide whether a bump is shown. Atomic conditions
//! compare a single cart reading against a threshold; composite conditions combine children
//! with AND/OR and nest to any depth.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::CartContext;

pub mod composite;
pub mod factory;
pub mod registry;

pub use composite::CompositeCondition;
pub use factory::{ConditionDescriptor, ConditionFactory, DescriptorValue};
pub use registry::ConditionRegistry;

/// Logic operator used to combine conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Logic {
    /// Every condition must be satisfied.
    #[default]
    And,

    /// At least one condition must be satisfied.
    Or,
}

impl Logic {
    /// Parse a configured operator. Only `OR` (any case) selects [`Logic::Or`]; anything else
    /// is AND.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("or") {
            Self::Or
        } else {
            Self::And
        }
    }

    /// Configuration name of the operator.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Evaluate `conditions` left to right under this operator.
    ///
    /// AND stops at the first unsatisfied condition and OR at the first satisfied one. An empty
    /// list is never satisfied, whatever the operator.
    pub fn evaluate<C: CartContext + ?Sized>(self, conditions: &[Condition], cart: &C) -> bool {
        if conditions.is_empty() {
            return false;
        }

        match self {
            Self::And => conditions.iter().all(|condition| condition.is_satisfied(cart)),
            Self::Or => conditions.iter().any(|condition| condition.is_satisfied(cart)),
        }
    }
}

impl From<String> for Logic {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Logic> for String {
    fn from(logic: Logic) -> Self {
        logic.as_str().to_string()
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Cart total is at least the threshold.
    CartTotalAtLeast(Decimal),

    /// Cart subtotal is at least the threshold.
    CartSubtotalAtLeast(Decimal),

    /// Number of units in the cart is at least the threshold.
    CartItemCountAtLeast(Decimal),

    /// The shopper is logged in.
    UserLoggedIn,

    /// Nested group of conditions.
    Composite(Box<CompositeCondition>),
}

impl Condition {
    /// Evaluate the condition against live cart state.
    pub fn is_satisfied<C: CartContext + ?Sized>(&self, cart: &C) -> bool {
        match self {
            Self::CartTotalAtLeast(threshold) => cart.total().amount() >= threshold,
            Self::CartSubtotalAtLeast(threshold) => cart.subtotal().amount() >= threshold,
            Self::CartItemCountAtLeast(threshold) => Decimal::from(cart.item_count()) >= *threshold,
            Self::UserLoggedIn => cart.is_user_logged_in(),
            Self::Composite(group) => group.is_satisfied(cart),
        }
    }

    /// Re-derive the descriptor this condition can be built from.
    pub fn to_descriptor(&self) -> ConditionDescriptor {
        match self {
            Self::CartTotalAtLeast(threshold) => ConditionDescriptor::atomic(
                factory::CART_TOTAL,
                DescriptorValue::Number(*threshold),
            ),
            Self::CartSubtotalAtLeast(threshold) => ConditionDescriptor::atomic(
                factory::CART_SUBTOTAL,
                DescriptorValue::Number(*threshold),
            ),
            Self::CartItemCountAtLeast(threshold) => ConditionDescriptor::atomic(
                factory::CART_ITEM_COUNT,
                DescriptorValue::Number(*threshold),
            ),
            Self::UserLoggedIn => {
                ConditionDescriptor::atomic(factory::USER_LOGGED_IN, DescriptorValue::Flag(true))
            }
            Self::Composite(group) => group.to_descriptor(),
        }
    }
}

impl From<CompositeCondition> for Condition {
    fn from(group: CompositeCondition) -> Self {
        Self::Composite(Box::new(group))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};

    use crate::cart::CartSnapshot;

    use super::*;

    #[test]
    fn logic_parse_defaults_to_and() {
        assert_eq!(Logic::parse("OR"), Logic::Or);
        assert_eq!(Logic::parse("or"), Logic::Or);
        assert_eq!(Logic::parse(" Or "), Logic::Or);
        assert_eq!(Logic::parse("AND"), Logic::And);
        assert_eq!(Logic::parse("xor"), Logic::And);
        assert_eq!(Logic::parse(""), Logic::And);
        assert_eq!(Logic::default(), Logic::And);
    }

    #[test]
    fn thresholds_are_inclusive() {
        let cart = CartSnapshot::empty(GBP)
            .with_total(Money::from_minor(500, GBP))
            .with_subtotal(Money::from_minor(300, GBP))
            .with_item_count(2);

        assert!(Condition::CartTotalAtLeast(Decimal::from(5)).is_satisfied(&cart));
        assert!(!Condition::CartTotalAtLeast(Decimal::new(501, 2)).is_satisfied(&cart));

        assert!(Condition::CartSubtotalAtLeast(Decimal::from(3)).is_satisfied(&cart));
        assert!(!Condition::CartSubtotalAtLeast(Decimal::from(4)).is_satisfied(&cart));

        assert!(Condition::CartItemCountAtLeast(Decimal::from(2)).is_satisfied(&cart));
        assert!(!Condition::CartItemCountAtLeast(Decimal::from(3)).is_satisfied(&cart));
    }

    #[test]
    fn total_and_subtotal_are_read_separately() {
        let cart = CartSnapshot::empty(GBP)
            .with_total(Money::from_minor(900, GBP))
            .with_subtotal(Money::from_minor(1000, GBP));

        assert!(!Condition::CartTotalAtLeast(Decimal::from(10)).is_satisfied(&cart));
        assert!(Condition::CartSubtotalAtLeast(Decimal::from(10)).is_satisfied(&cart));
    }

    #[test]
    fn user_logged_in_reads_the_request() {
        let anonymous = CartSnapshot::empty(GBP);
        let customer = CartSnapshot::empty(GBP).with_logged_in(true);

        assert!(!Condition::UserLoggedIn.is_satisfied(&anonymous));
        assert!(Condition::UserLoggedIn.is_satisfied(&customer));
    }

    #[test]
    fn empty_list_is_never_satisfied() {
        let cart = CartSnapshot::empty(GBP).with_logged_in(true);

        assert!(!Logic::And.evaluate(&[], &cart));
        assert!(!Logic::Or.evaluate(&[], &cart));
    }
}
