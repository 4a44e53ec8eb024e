//! Checkout
//!
//! [`OrderBumps`] owns the loaded bump configuration and its compiled condition registry, and
//! answers the checkout page's questions: which bumps to show, where, and with which offers.

use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use crate::{
    bumps::{
        BumpConfig, BumpId,
        display::{Placement, should_display},
        offers::{OfferError, Offers, resolve_offers},
    },
    cart::{CartContext, CartSnapshot},
    catalog::Catalog,
    conditions::{ConditionFactory, ConditionRegistry, Logic},
    config::{BumpsConfig, ConfigError},
};

/// Loaded bump configuration
#[derive(Debug, Clone)]
pub struct OrderBumps {
    bumps: Vec<BumpConfig>,
    registry: ConditionRegistry,
    default_logic: Logic,
}

impl OrderBumps {
    /// Compile bumps with the built-in condition types.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateBump`] if two bumps share an id.
    pub fn from_bumps(bumps: Vec<BumpConfig>, default_logic: Logic) -> Result<Self, ConfigError> {
        Self::with_factory(bumps, default_logic, &ConditionFactory::new())
    }

    /// Compile bumps through a custom condition factory.
    ///
    /// Each bump's condition descriptors are built once into a fresh registry. Bumps without
    /// conditions register nothing and are never displayed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateBump`] if two bumps share an id.
    pub fn with_factory(
        bumps: Vec<BumpConfig>,
        default_logic: Logic,
        factory: &ConditionFactory,
    ) -> Result<Self, ConfigError> {
        let mut seen = FxHashSet::default();
        let mut registry = ConditionRegistry::new();

        for bump in &bumps {
            if !seen.insert(bump.id) {
                return Err(ConfigError::DuplicateBump(bump.id));
            }

            if bump.conditions.is_empty() {
                debug!(bump = %bump.id, "bump has no conditions");
                continue;
            }

            let conditions = factory.build_all(&bump.conditions);

            debug!(
                bump = %bump.id,
                configured = bump.conditions.len(),
                built = conditions.len(),
                "compiled bump conditions"
            );

            registry.register(bump.id, conditions);
        }

        info!(
            bumps = bumps.len(),
            registered = registry.len(),
            %default_logic,
            "loaded order bumps"
        );

        Ok(Self {
            bumps,
            registry,
            default_logic,
        })
    }

    /// Compile a parsed configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateBump`] if two bumps share an id.
    pub fn from_config(config: BumpsConfig) -> Result<Self, ConfigError> {
        let default_logic = config.default_logic();
        let bumps = config.bumps.into_iter().map(BumpConfig::from).collect();

        Self::from_bumps(bumps, default_logic)
    }

    /// Read, parse and compile a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if two bumps share an id.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_config(BumpsConfig::load(path)?)
    }

    /// Replace the logic used by bumps without an override.
    #[must_use]
    pub fn with_default_logic(mut self, default_logic: Logic) -> Self {
        self.default_logic = default_logic;
        self
    }

    /// Configured bumps, in configuration order.
    pub fn bumps(&self) -> &[BumpConfig] {
        &self.bumps
    }

    /// Find a bump by id.
    pub fn bump(&self, id: BumpId) -> Option<&BumpConfig> {
        self.bumps.iter().find(|bump| bump.id == id)
    }

    /// Compiled condition registry.
    pub fn registry(&self) -> &ConditionRegistry {
        &self.registry
    }

    /// Logic used by bumps without an override.
    pub fn default_logic(&self) -> Logic {
        self.default_logic
    }

    /// Whether a bump should be displayed for the cart. Unknown bumps never are.
    pub fn should_display<C: CartContext + ?Sized>(&self, id: BumpId, cart: &C) -> bool {
        self.bump(id).is_some_and(|bump| {
            should_display(bump, &self.registry, self.default_logic, cart)
        })
    }

    /// Placements for every bump to display, in configuration order.
    ///
    /// The cart is read once, so every bump in the pass sees the same totals.
    #[tracing::instrument(skip_all, fields(bumps = self.bumps.len()))]
    pub fn placements<C: CartContext + ?Sized>(&self, cart: &C) -> Vec<Placement> {
        let snapshot = CartSnapshot::capture(cart);

        let placements: Vec<Placement> = self
            .bumps
            .iter()
            .filter(|bump| should_display(bump, &self.registry, self.default_logic, &snapshot))
            .map(Placement::for_bump)
            .collect();

        info!(displayed = placements.len(), "evaluated order bumps");

        placements
    }

    /// Offers for a bump.
    ///
    /// # Errors
    ///
    /// Returns [`OfferError::UnknownBump`] for an unconfigured bump, or
    /// [`OfferError::NoProducts`] if none of its products can be offered.
    pub fn offers<'a, K: Catalog<'a> + ?Sized>(
        &self,
        id: BumpId,
        catalog: &K,
    ) -> Result<Offers<'a>, OfferError> {
        let bump = self.bump(id).ok_or(OfferError::UnknownBump(id))?;

        resolve_offers(bump, catalog)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::GBP};
    use testresult::TestResult;

    use crate::{
        bumps::{BumpProduct, DisplayLocation},
        catalog::{CatalogProduct, MemoryCatalog, ProductId},
        conditions::{
            ConditionDescriptor, DescriptorValue,
            factory::{CART_ITEM_COUNT, CART_TOTAL, USER_LOGGED_IN},
        },
    };

    use super::*;

    fn total_at_least(amount: i64) -> ConditionDescriptor {
        ConditionDescriptor::atomic(CART_TOTAL, Decimal::from(amount))
    }

    fn cart(total_minor: i64, item_count: u64) -> CartSnapshot<'static> {
        CartSnapshot::empty(GBP)
            .with_total(Money::from_minor(total_minor, GBP))
            .with_item_count(item_count)
    }

    fn order_bumps() -> Result<OrderBumps, ConfigError> {
        OrderBumps::from_bumps(
            vec![
                BumpConfig::new(BumpId(1), "Bump 1")
                    .with_condition(total_at_least(5))
                    .with_product(BumpProduct::new(ProductId(59))),
                BumpConfig::new(BumpId(2), "Bump 2")
                    .with_display_location(DisplayLocation::BeforePayment)
                    .with_logic(Logic::Or)
                    .with_condition(ConditionDescriptor::atomic(
                        USER_LOGGED_IN,
                        DescriptorValue::Flag(true),
                    ))
                    .with_condition(ConditionDescriptor::atomic(
                        CART_ITEM_COUNT,
                        Decimal::from(2),
                    )),
                BumpConfig::new(BumpId(3), "Bump 3"),
            ],
            Logic::And,
        )
    }

    #[test]
    fn registers_only_bumps_with_conditions() -> TestResult {
        let bumps = order_bumps()?;

        assert_eq!(bumps.registry().len(), 2);
        assert!(!bumps.registry().contains(BumpId(3)));
        assert_eq!(bumps.registry().get(BumpId(2)).len(), 2);

        Ok(())
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = OrderBumps::from_bumps(
            vec![
                BumpConfig::new(BumpId(1), "First"),
                BumpConfig::new(BumpId(1), "Second"),
            ],
            Logic::And,
        );

        assert!(matches!(result, Err(ConfigError::DuplicateBump(BumpId(1)))));
    }

    #[test]
    fn placements_follow_configuration_order() -> TestResult {
        let bumps = order_bumps()?;

        let placements = bumps.placements(&cart(500, 2));
        let ids: Vec<BumpId> = placements.iter().map(|placement| placement.bump).collect();

        assert_eq!(ids, vec![BumpId(1), BumpId(2)]);
        assert_eq!(
            placements.get(1).map(Placement::slot),
            Some("review_order_before_payment")
        );

        Ok(())
    }

    #[test]
    fn placements_skip_bumps_whose_conditions_fail() -> TestResult {
        let bumps = order_bumps()?;

        assert!(bumps.placements(&cart(499, 0)).is_empty());

        let placements = bumps.placements(&cart(0, 0).with_logged_in(true));

        assert_eq!(placements.len(), 1);
        assert_eq!(placements.first().map(|p| p.bump), Some(BumpId(2)));

        Ok(())
    }

    #[test]
    fn unknown_bump_is_not_displayed() -> TestResult {
        let bumps = order_bumps()?;

        assert!(!bumps.should_display(BumpId(404), &cart(100_000, 10)));
        assert!(bumps.should_display(BumpId(1), &cart(500, 0)));

        Ok(())
    }

    #[test]
    fn offers_for_unknown_bump_fail() -> TestResult {
        let bumps = order_bumps()?;
        let catalog = MemoryCatalog::new();

        assert_eq!(
            bumps.offers(BumpId(404), &catalog),
            Err(OfferError::UnknownBump(BumpId(404)))
        );

        Ok(())
    }

    #[test]
    fn offers_resolve_through_catalog() -> TestResult {
        let bumps = order_bumps()?;
        let catalog: MemoryCatalog<'_> = [CatalogProduct::new(
            ProductId(59),
            "Socks",
            Money::from_minor(500, GBP),
        )]
        .into_iter()
        .collect();

        let offers = bumps.offers(BumpId(1), &catalog)?;

        assert_eq!(offers.len(), 1);
        assert_eq!(offers.first().map(|offer| offer.name.as_str()), Some("Socks"));

        Ok(())
    }
}
