//! Order bumps prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bumps::{
        BumpConfig, BumpId, BumpProduct, DisplayLocation, Layout,
        display::{Placement, should_display},
        offers::{BumpOffer, OfferError, Offers, add_bump_product, resolve_offers},
    },
    cart::{
        Cart, CartContext, CartError, CartLine, CartSnapshot, LineDiscount, LineId,
        memory::MemoryCart,
    },
    catalog::{Catalog, CatalogProduct, MemoryCatalog, ProductId},
    checkout::OrderBumps,
    conditions::{
        CompositeCondition, Condition, ConditionDescriptor, ConditionFactory, ConditionRegistry,
        DescriptorValue, Logic,
    },
    config::{BumpDescriptor, BumpsConfig, ConfigError, ProductDescriptor},
    discounts::{
        BumpDiscount, DiscountError, DiscountKind, apply_bump_discounts, resolve, try_resolve,
    },
    fixtures::{Fixture, FixtureError},
    report::{CheckoutReport, ReportError},
};
