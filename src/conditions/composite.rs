//! Composite Conditions

use smallvec::SmallVec;

use crate::{
    cart::CartContext,
    conditions::{Condition, ConditionDescriptor, Logic},
};

/// Group of conditions combined with a single logic operator.
///
/// Children are evaluated in insertion order and the tree shape is kept as built, so
/// `AND(OR(a, b), c)` stays distinct from `OR(a, AND(b, c))`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeCondition {
    logic: Logic,
    conditions: SmallVec<[Condition; 2]>,
}

impl CompositeCondition {
    /// Create an empty group.
    pub fn new(logic: Logic) -> Self {
        Self {
            logic,
            conditions: SmallVec::new(),
        }
    }

    /// Create a group from its operator and children.
    pub fn with_conditions(logic: Logic, conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self {
            logic,
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Operator combining the children.
    pub fn logic(&self) -> Logic {
        self.logic
    }

    /// Replace the operator.
    pub fn set_logic(&mut self, logic: Logic) {
        self.logic = logic;
    }

    /// Append a child.
    pub fn add_condition(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    /// Append several children, keeping their order.
    pub fn add_conditions(&mut self, conditions: impl IntoIterator<Item = Condition>) {
        self.conditions.extend(conditions);
    }

    /// Children in evaluation order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Check if the group has no children.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Evaluate the group. An empty group is never satisfied.
    pub fn is_satisfied<C: CartContext + ?Sized>(&self, cart: &C) -> bool {
        self.logic.evaluate(&self.conditions, cart)
    }

    /// Re-derive the group descriptor, children included.
    pub fn to_descriptor(&self) -> ConditionDescriptor {
        ConditionDescriptor::group(
            self.logic,
            self.conditions.iter().map(Condition::to_descriptor).collect(),
        )
    }
}
