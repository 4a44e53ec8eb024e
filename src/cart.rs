//! Cart
//!
//! The bump engine never owns cart state. Display conditions read it through [`CartContext`],
//! and accepting a bump writes to it through [`Cart`].

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use thiserror::Error;

use crate::{
    catalog::{CatalogProduct, ProductId},
    discounts::BumpDiscount,
};

pub mod memory;

new_key_type! {
    /// Cart line key
    pub struct LineId;
}

/// Errors raised by a cart when adding or repricing lines.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product is not in the catalog.
    #[error("Product {0} not found")]
    ProductNotFound(ProductId),

    /// The product cannot be purchased.
    #[error("Product {0} cannot be purchased")]
    NotPurchasable(ProductId),

    /// The product is out of stock.
    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),

    /// A line must hold at least one unit.
    #[error("Quantity must be at least 1 for product {0}")]
    ZeroQuantity(ProductId),

    /// A product's currency differs from the cart currency.
    #[error("Product {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(ProductId, &'static str, &'static str),

    /// The line does not exist in the cart.
    #[error("Cart line not found")]
    LineNotFound(LineId),
}

/// Read access to live cart state.
pub trait CartContext {
    /// Running total after line discounts, before tax and shipping.
    fn total(&self) -> Money<'_, Currency>;

    /// Sum of lines at their base prices.
    fn subtotal(&self) -> Money<'_, Currency>;

    /// Number of units in the cart.
    fn item_count(&self) -> u64;

    /// Whether the current request belongs to an authenticated user.
    fn is_user_logged_in(&self) -> bool;
}

/// Write access to the cart.
pub trait Cart<'a>: CartContext {
    /// Add a product to the cart, optionally carrying bump discount metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the cart refuses the product.
    fn add_item(
        &mut self,
        product: &CatalogProduct<'a>,
        quantity: u32,
        discount: Option<LineDiscount<'a>>,
    ) -> Result<LineId, CartError>;

    /// Iterate over the cart lines.
    fn lines<'s>(&'s self) -> impl Iterator<Item = (LineId, &'s CartLine<'a>)>
    where
        'a: 's;

    /// Override the unit price used for a line in subsequent totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if the line is not in the cart.
    fn set_effective_price(
        &mut self,
        line: LineId,
        price: Money<'a, Currency>,
    ) -> Result<(), CartError>;
}

/// Bump discount metadata attached to a cart line.
///
/// The original price is captured when the line is created and never changes, so the discount
/// is always computed from it and never compounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineDiscount<'a> {
    discount: BumpDiscount,
    original_price: Money<'a, Currency>,
}

impl<'a> LineDiscount<'a> {
    /// Capture a discount against the product's original price.
    pub fn new(discount: BumpDiscount, original_price: Money<'a, Currency>) -> Self {
        Self {
            discount,
            original_price,
        }
    }

    /// The discount to apply.
    pub fn discount(&self) -> &BumpDiscount {
        &self.discount
    }

    /// The price captured when the line entered the cart.
    pub fn original_price(&self) -> Money<'a, Currency> {
        self.original_price
    }
}

/// A single cart line
#[derive(Debug, Clone)]
pub struct CartLine<'a> {
    product: ProductId,
    quantity: u32,
    base_price: Money<'a, Currency>,
    effective_price: Money<'a, Currency>,
    discount: Option<LineDiscount<'a>>,
}

impl<'a> CartLine<'a> {
    /// Create a line priced at `base_price`.
    pub fn new(
        product: ProductId,
        quantity: u32,
        base_price: Money<'a, Currency>,
        discount: Option<LineDiscount<'a>>,
    ) -> Self {
        Self {
            product,
            quantity,
            base_price,
            effective_price: base_price,
            discount,
        }
    }

    /// Product on this line.
    pub fn product(&self) -> ProductId {
        self.product
    }

    /// Units on this line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price when the line was added.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Unit price used for totals.
    pub fn effective_price(&self) -> &Money<'a, Currency> {
        &self.effective_price
    }

    /// Bump discount metadata, if the line came from a bump.
    pub fn discount(&self) -> Option<&LineDiscount<'a>> {
        self.discount.as_ref()
    }

    pub(crate) fn set_effective_price(&mut self, price: Money<'a, Currency>) {
        self.effective_price = price;
    }
}

/// Cart readings taken once, so every bump in a pass sees the same cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartSnapshot<'a> {
    total: Money<'a, Currency>,
    subtotal: Money<'a, Currency>,
    item_count: u64,
    logged_in: bool,
}

impl<'a> CartSnapshot<'a> {
    /// Snapshot of an empty cart for an anonymous shopper.
    pub fn empty(currency: &'a Currency) -> Self {
        Self {
            total: Money::from_minor(0, currency),
            subtotal: Money::from_minor(0, currency),
            item_count: 0,
            logged_in: false,
        }
    }

    /// Read every value from a live cart.
    pub fn capture<C: CartContext + ?Sized>(cart: &'a C) -> Self {
        Self {
            total: cart.total(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
            logged_in: cart.is_user_logged_in(),
        }
    }

    /// Set the total.
    #[must_use]
    pub fn with_total(mut self, total: Money<'a, Currency>) -> Self {
        self.total = total;
        self
    }

    /// Set the subtotal.
    #[must_use]
    pub fn with_subtotal(mut self, subtotal: Money<'a, Currency>) -> Self {
        self.subtotal = subtotal;
        self
    }

    /// Set the unit count.
    #[must_use]
    pub fn with_item_count(mut self, item_count: u64) -> Self {
        self.item_count = item_count;
        self
    }

    /// Set whether the shopper is logged in.
    #[must_use]
    pub fn with_logged_in(mut self, logged_in: bool) -> Self {
        self.logged_in = logged_in;
        self
    }
}

impl CartContext for CartSnapshot<'_> {
    fn total(&self) -> Money<'_, Currency> {
        self.total
    }

    fn subtotal(&self) -> Money<'_, Currency> {
        self.subtotal
    }

    fn item_count(&self) -> u64 {
        self.item_count
    }

    fn is_user_logged_in(&self) -> bool {
        self.logged_in
    }
}
