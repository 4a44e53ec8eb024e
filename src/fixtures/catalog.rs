//! Catalog Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    catalog::{CatalogProduct, ProductId},
    fixtures::FixtureError,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product id -> product fixture
    pub products: FxHashMap<ProductId, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Regular price (e.g., "9.00 GBP")
    pub price: String,

    /// Sale price in the same currency
    #[serde(default)]
    pub sale_price: Option<String>,

    /// Whether the product can be bought
    #[serde(default = "enabled")]
    pub purchasable: bool,

    /// Whether the product is in stock
    #[serde(default = "enabled")]
    pub in_stock: bool,

    /// Thumbnail image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

fn enabled() -> bool {
    true
}

impl ProductFixture {
    /// Build the catalog product stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if a price cannot be parsed or the sale price is in another currency.
    pub fn into_product(self, id: ProductId) -> Result<CatalogProduct<'static>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;
        let mut product =
            CatalogProduct::new(id, self.name, Money::from_minor(minor_units, currency));

        if let Some(sale_price) = &self.sale_price {
            let (sale_minor, sale_currency) = parse_price(sale_price)?;

            if sale_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    currency.iso_alpha_code.to_string(),
                    sale_currency.iso_alpha_code.to_string(),
                ));
            }

            product = product.with_sale_price(Money::from_minor(sale_minor, currency));
        }

        product.purchasable = self.purchasable;
        product.in_stock = self.in_stock;
        product.image_url = self.image_url;

        Ok(product)
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let minor_units = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}
