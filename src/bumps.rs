//! Bumps
//!
//! Configured bump offers: what they sell, where they render, and the conditions that gate them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::ProductId,
    conditions::{ConditionDescriptor, Logic},
    discounts::BumpDiscount,
};

pub mod display;
pub mod offers;

/// Bump identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct BumpId(pub u64);

impl fmt::Display for BumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checkout slot a bump renders in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayLocation {
    /// Before the order review table
    #[default]
    BeforeOrderReview,

    /// After the order review table
    AfterOrderReview,

    /// Before the payment methods
    BeforePayment,

    /// After the payment methods
    AfterPayment,
}

impl DisplayLocation {
    /// Parse a configured location, falling back to [`DisplayLocation::BeforeOrderReview`].
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "after_order_review" => Self::AfterOrderReview,
            "before_payment" => Self::BeforePayment,
            "after_payment" => Self::AfterPayment,
            _ => Self::BeforeOrderReview,
        }
    }

    /// Configuration name of the location.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeOrderReview => "before_order_review",
            Self::AfterOrderReview => "after_order_review",
            Self::BeforePayment => "before_payment",
            Self::AfterPayment => "after_payment",
        }
    }

    /// Render hook the checkout page exposes for this location.
    pub const fn slot(self) -> &'static str {
        match self {
            Self::BeforeOrderReview => "checkout_before_order_review",
            Self::AfterOrderReview => "checkout_after_order_review",
            Self::BeforePayment => "review_order_before_payment",
            Self::AfterPayment => "review_order_after_payment",
        }
    }
}

impl From<String> for DisplayLocation {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<DisplayLocation> for String {
    fn from(location: DisplayLocation) -> Self {
        location.as_str().to_string()
    }
}

/// How a bump's products are laid out.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Layout {
    /// One product per row
    #[default]
    List,

    /// Product grid
    Grid,

    /// Named custom template, e.g. `template-1`
    Template(String),
}

impl Layout {
    /// Parse a configured layout. Empty values are [`Layout::List`].
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "list" => Self::List,
            "grid" => Self::Grid,
            template => Self::Template(template.to_string()),
        }
    }

    /// Configuration name of the layout.
    pub fn as_str(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
            Self::Template(name) => name,
        }
    }
}

impl From<String> for Layout {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Layout> for String {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Template(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// A product offered by a bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpProduct {
    /// Catalog product
    pub product: ProductId,

    /// Discount off the regular price
    pub discount: Option<BumpDiscount>,

    /// Units added when the shopper accepts the offer
    pub quantity: u32,
}

impl BumpProduct {
    /// Offer one unit of a product at its current price.
    pub fn new(product: ProductId) -> Self {
        Self {
            product,
            discount: None,
            quantity: 1,
        }
    }

    /// Offer the product with a discount.
    #[must_use]
    pub fn with_discount(mut self, discount: BumpDiscount) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Offer several units.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// Bump configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BumpConfig {
    /// Unique bump identifier
    pub id: BumpId,

    /// Display name
    pub name: String,

    /// Product layout
    pub layout: Layout,

    /// Checkout slot
    pub display_location: DisplayLocation,

    /// Logic override for the top-level conditions
    pub logic: Option<Logic>,

    /// Raw condition descriptors, compiled when the bump is loaded
    pub conditions: Vec<ConditionDescriptor>,

    /// Offered products
    pub products: Vec<BumpProduct>,
}

impl BumpConfig {
    /// Create a bump with no conditions and no products.
    pub fn new(id: BumpId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            layout: Layout::default(),
            display_location: DisplayLocation::default(),
            logic: None,
            conditions: Vec::new(),
            products: Vec::new(),
        }
    }

    /// Add a top-level condition descriptor.
    #[must_use]
    pub fn with_condition(mut self, condition: ConditionDescriptor) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Add an offered product.
    #[must_use]
    pub fn with_product(mut self, product: BumpProduct) -> Self {
        self.products.push(product);
        self
    }

    /// Override the global logic for this bump.
    #[must_use]
    pub fn with_logic(mut self, logic: Logic) -> Self {
        self.logic = Some(logic);
        self
    }

    /// Render the bump in another checkout slot.
    #[must_use]
    pub fn with_display_location(mut self, display_location: DisplayLocation) -> Self {
        self.display_location = display_location;
        self
    }

    /// Use another product layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }
}
