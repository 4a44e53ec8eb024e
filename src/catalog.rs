//! Catalog
//!
//! Read-only product lookup used when resolving bump offers and adding bumped products to the
//! cart.

use std::fmt;

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};

/// Catalog product identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog product
#[derive(Debug, Clone)]
pub struct CatalogProduct<'a> {
    /// Product identifier
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Regular (list) price, the base for bump discounts
    pub regular_price: Money<'a, Currency>,

    /// Current selling price, which may include a sale
    pub price: Money<'a, Currency>,

    /// Whether the product can be bought at all
    pub purchasable: bool,

    /// Whether the product is in stock
    pub in_stock: bool,

    /// Thumbnail image URL
    pub image_url: Option<String>,
}

impl<'a> CatalogProduct<'a> {
    /// Create a purchasable, in-stock product selling at its regular price.
    pub fn new(id: ProductId, name: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            id,
            name: name.into(),
            regular_price: price,
            price,
            purchasable: true,
            in_stock: true,
            image_url: None,
        }
    }

    /// Set a sale price below the regular price.
    #[must_use]
    pub fn with_sale_price(mut self, price: Money<'a, Currency>) -> Self {
        self.price = price;
        self
    }

    /// Whether the product can currently be offered and added to a cart.
    pub fn is_available(&self) -> bool {
        self.purchasable && self.in_stock
    }
}

/// Product lookup collaborator.
pub trait Catalog<'a> {
    /// Find a product by id.
    fn product(&self, id: ProductId) -> Option<&CatalogProduct<'a>>;
}

/// Catalog held in memory, keyed by product id.
#[derive(Debug, Default)]
pub struct MemoryCatalog<'a> {
    products: FxHashMap<ProductId, CatalogProduct<'a>>,
}

impl<'a> MemoryCatalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product, returning any product previously stored under the same id.
    pub fn insert(&mut self, product: CatalogProduct<'a>) -> Option<CatalogProduct<'a>> {
        self.products.insert(product.id, product)
    }

    /// Number of products in the catalog.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> Catalog<'a> for MemoryCatalog<'a> {
    fn product(&self, id: ProductId) -> Option<&CatalogProduct<'a>> {
        self.products.get(&id)
    }
}

impl<'a> FromIterator<CatalogProduct<'a>> for MemoryCatalog<'a> {
    fn from_iter<I: IntoIterator<Item = CatalogProduct<'a>>>(iter: I) -> Self {
        Self {
            products: iter.into_iter().map(|p| (p.id, p)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;

    use super::*;

    #[test]
    fn lookup_by_id() {
        let catalog: MemoryCatalog<'_> = [
            CatalogProduct::new(ProductId(59), "Socks", Money::from_minor(500, GBP)),
            CatalogProduct::new(ProductId(187), "Beanie", Money::from_minor(1200, GBP)),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.product(ProductId(187)).map(|p| p.name.as_str()),
            Some("Beanie")
        );
        assert!(catalog.product(ProductId(1)).is_none());
    }

    #[test]
    fn availability_needs_purchasable_and_stock() {
        let mut product = CatalogProduct::new(ProductId(1), "Mug", Money::from_minor(800, GBP));

        assert!(product.is_available());

        product.in_stock = false;
        assert!(!product.is_available());

        product.in_stock = true;
        product.purchasable = false;
        assert!(!product.is_available());
    }

    #[test]
    fn sale_price_keeps_regular_price() {
        let product = CatalogProduct::new(ProductId(1), "Mug", Money::from_minor(800, GBP))
            .with_sale_price(Money::from_minor(600, GBP));

        assert_eq!(product.regular_price, Money::from_minor(800, GBP));
        assert_eq!(product.price, Money::from_minor(600, GBP));
    }
}
