//! Cart Fixtures

use serde::Deserialize;

use crate::catalog::ProductId;

/// Cart contents in YAML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartFixture {
    /// Whether the shopper is logged in
    #[serde(default)]
    pub logged_in: bool,

    /// Lines to add, in order
    #[serde(default)]
    pub items: Vec<CartItemFixture>,
}

/// Cart Item Fixture
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemFixture {
    /// Catalog product
    pub product: ProductId,

    /// Units on the line
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}
