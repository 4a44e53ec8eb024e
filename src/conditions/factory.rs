//! Condition Factory
//!
//! Builds condition trees from declarative descriptors.
//!
//! A descriptor is either atomic (`{ type, value }`) or a group (`{ logic, conditions }`).
//! Malformed or unknown descriptors are skipped and logged. They never fail the surrounding
//! tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::conditions::{CompositeCondition, Condition, Logic};

/// Type tag for [`Condition::CartTotalAtLeast`].
pub const CART_TOTAL: &str = "cart_total";

/// Type tag for [`Condition::CartSubtotalAtLeast`].
pub const CART_SUBTOTAL: &str = "cart_sub_total";

/// Type tag for [`Condition::CartItemCountAtLeast`].
pub const CART_ITEM_COUNT: &str = "cart_item_count";

/// Type tag for [`Condition::UserLoggedIn`].
pub const USER_LOGGED_IN: &str = "user_logged_in";

/// Builds a condition from a descriptor value, or `None` if the value is unusable.
pub type ConditionConstructor = fn(&DescriptorValue) -> Option<Condition>;

/// Built-in condition types.
pub const CONDITION_TYPES: &[(&str, ConditionConstructor)] = &[
    (CART_TOTAL, cart_total),
    (CART_SUBTOTAL, cart_subtotal),
    ("cart_subtotal", cart_subtotal),
    (CART_ITEM_COUNT, cart_item_count),
    (USER_LOGGED_IN, user_logged_in),
];

/// Value attached to an atomic descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DescriptorValue {
    /// Numeric threshold
    Number(Decimal),

    /// Boolean flag
    Flag(bool),

    /// Any other text
    Text(String),
}

impl DescriptorValue {
    /// Numeric value, if this is a number.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Flag(_) | Self::Text(_) => None,
        }
    }
}

impl From<Decimal> for DescriptorValue {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// Declarative condition, as written in configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ConditionDescriptor {
    /// Atomic condition type tag
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Atomic condition value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DescriptorValue>,

    /// Group operator
    #[serde(
        default,
        deserialize_with = "crate::config::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub logic: Option<String>,

    /// Group children. Present means this descriptor is a group.
    #[serde(
        default,
        deserialize_with = "crate::config::lenient_group",
        skip_serializing_if = "Option::is_none"
    )]
    pub conditions: Option<Vec<ConditionDescriptor>>,
}

impl ConditionDescriptor {
    /// Atomic descriptor.
    pub fn atomic(kind: impl Into<String>, value: impl Into<DescriptorValue>) -> Self {
        Self {
            kind: Some(kind.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Group descriptor.
    pub fn group(logic: Logic, conditions: Vec<ConditionDescriptor>) -> Self {
        Self {
            logic: Some(logic.as_str().to_string()),
            conditions: Some(conditions),
            ..Self::default()
        }
    }

    /// Whether this descriptor describes a group.
    pub fn is_group(&self) -> bool {
        self.conditions.is_some()
    }
}

/// Threshold on the cart total.
pub fn cart_total(value: &DescriptorValue) -> Option<Condition> {
    value.as_decimal().map(Condition::CartTotalAtLeast)
}

/// Threshold on the cart subtotal.
pub fn cart_subtotal(value: &DescriptorValue) -> Option<Condition> {
    value.as_decimal().map(Condition::CartSubtotalAtLeast)
}

/// Threshold on the number of units in the cart.
pub fn cart_item_count(value: &DescriptorValue) -> Option<Condition> {
    value.as_decimal().map(Condition::CartItemCountAtLeast)
}

/// Logged-in shopper. The value is not used.
pub fn user_logged_in(_value: &DescriptorValue) -> Option<Condition> {
    Some(Condition::UserLoggedIn)
}

/// Builds condition trees, resolving atomic type tags through a constructor table.
#[derive(Debug, Clone, Copy)]
pub struct ConditionFactory {
    types: &'static [(&'static str, ConditionConstructor)],
}

impl Default for ConditionFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionFactory {
    /// Factory over the built-in condition types.
    pub const fn new() -> Self {
        Self::with_types(CONDITION_TYPES)
    }

    /// Factory over a custom constructor table.
    pub const fn with_types(types: &'static [(&'static str, ConditionConstructor)]) -> Self {
        Self { types }
    }

    /// Look up the constructor for a type tag.
    pub fn constructor(&self, kind: &str) -> Option<ConditionConstructor> {
        self.types
            .iter()
            .find(|(name, _)| *name == kind)
            .map(|(_, constructor)| *constructor)
    }

    /// Build a condition tree from a descriptor.
    ///
    /// Groups always build, keeping whichever children build. Atomic descriptors without both
    /// `type` and `value`, with an unknown type, or with an unusable value build nothing.
    pub fn build(&self, descriptor: &ConditionDescriptor) -> Option<Condition> {
        if let Some(children) = &descriptor.conditions {
            let logic = descriptor
                .logic
                .as_deref()
                .map_or_else(Logic::default, Logic::parse);

            let group = CompositeCondition::with_conditions(
                logic,
                children.iter().filter_map(|child| self.build(child)),
            );

            return Some(group.into());
        }

        let (Some(kind), Some(value)) = (descriptor.kind.as_deref(), descriptor.value.as_ref())
        else {
            warn!(?descriptor, "skipping condition without both `type` and `value`");
            return None;
        };

        let Some(constructor) = self.constructor(kind) else {
            warn!(kind, "skipping condition of unknown type");
            return None;
        };

        let condition = constructor(value);

        if condition.is_none() {
            warn!(kind, ?value, "skipping condition with unusable value");
        }

        condition
    }

    /// Build every descriptor in a list, dropping the ones that do not build.
    pub fn build_all(&self, descriptors: &[ConditionDescriptor]) -> Vec<Condition> {
        descriptors
            .iter()
            .filter_map(|descriptor| self.build(descriptor))
            .collect()
    }
}
