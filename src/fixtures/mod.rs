//! Fixtures
//!
//! A fixture set is a catalog, a cart and a bump configuration sharing one name:
//!
//! ```text
//! fixtures/catalog/<name>.yml
//! fixtures/carts/<name>.yml
//! fixtures/bumps/<name>.yml
//! ```

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, memory::MemoryCart},
    catalog::{Catalog, MemoryCatalog, ProductId},
    checkout::OrderBumps,
    config::{BumpsConfig, ConfigError},
    fixtures::{cart::CartFixture, catalog::CatalogFixture},
};

pub mod cart;
pub mod catalog;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Bump configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// No cart loaded
    #[error("No cart loaded")]
    NoCart,

    /// No bump configuration loaded
    #[error("No bump configuration loaded")]
    NoBumps,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products loaded so far
    catalog: MemoryCatalog<'a>,

    /// Cart contents, built into a cart on demand
    cart: Option<CartFixture>,

    /// Bump configuration
    bumps: Option<BumpsConfig>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: MemoryCatalog::new(),
            cart: None,
            bumps: None,
            currency: None,
        }
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for (id, product_fixture) in fixture.products {
            let product = product_fixture.into_product(id)?;
            let currency = product.price.currency();

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.catalog.insert(product);
        }

        Ok(self)
    }

    /// Load cart contents from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("carts").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        self.cart = Some(serde_norway::from_str(&contents)?);

        Ok(self)
    }

    /// Load the bump configuration from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_bumps(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("bumps").join(format!("{name}.yml"));

        self.bumps = Some(BumpsConfig::load(file_path)?);

        Ok(self)
    }

    /// Load a complete fixture set (catalog, cart and bumps with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_catalog(name)?
            .load_cart(name)?
            .load_bumps(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    pub fn catalog(&self) -> &MemoryCatalog<'a> {
        &self.catalog
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a cart from the loaded cart contents
    ///
    /// # Errors
    ///
    /// Returns an error if no cart or catalog is loaded, if a cart item references a missing
    /// product, or if the cart refuses an item.
    pub fn cart(&self) -> Result<MemoryCart<'a>, FixtureError> {
        let fixture = self.cart.as_ref().ok_or(FixtureError::NoCart)?;
        let mut cart = MemoryCart::new(self.currency()?);

        cart.set_logged_in(fixture.logged_in);

        for item in &fixture.items {
            let product = self
                .catalog
                .product(item.product)
                .ok_or(FixtureError::ProductNotFound(item.product))?;

            cart.add_item(product, item.quantity, None)?;
        }

        Ok(cart)
    }

    /// Compile the loaded bump configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no configuration is loaded or if it is invalid.
    pub fn order_bumps(&self) -> Result<OrderBumps, FixtureError> {
        let config = self.bumps.clone().ok_or(FixtureError::NoBumps)?;

        Ok(OrderBumps::from_config(config)?)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
