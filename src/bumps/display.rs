//! Display Decision

use tracing::debug;

use crate::{
    bumps::{BumpConfig, BumpId, DisplayLocation, Layout},
    cart::CartContext,
    conditions::{ConditionRegistry, Logic},
};

/// Decide whether a bump should be shown for the current cart.
///
/// The bump's registered conditions are combined under its logic override, or `default_logic`
/// when it has none, exactly as a fresh composite would combine them. A bump with no registered
/// conditions is never shown.
pub fn should_display<C: CartContext + ?Sized>(
    bump: &BumpConfig,
    registry: &ConditionRegistry,
    default_logic: Logic,
    cart: &C,
) -> bool {
    let conditions = registry.get(bump.id);
    let logic = bump.logic.unwrap_or(default_logic);
    let shown = logic.evaluate(conditions, cart);

    debug!(
        bump = %bump.id,
        %logic,
        conditions = conditions.len(),
        shown,
        "evaluated bump display conditions"
    );

    shown
}

/// Where and how a displayed bump renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Displayed bump
    pub bump: BumpId,

    /// Checkout slot
    pub location: DisplayLocation,

    /// Product layout
    pub layout: Layout,
}

impl Placement {
    /// Placement for a bump, taken from its configuration.
    pub fn for_bump(bump: &BumpConfig) -> Self {
        Self {
            bump: bump.id,
            location: bump.display_location,
            layout: bump.layout.clone(),
        }
    }

    /// Render hook for the placement's location.
    pub fn slot(&self) -> &'static str {
        self.location.slot()
    }
}
