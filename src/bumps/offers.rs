//! Bump Offers
//!
//! Turning a bump's product descriptors into displayable offers, and adding an accepted offer
//! to the cart.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    bumps::{BumpConfig, BumpId},
    cart::{Cart, CartError, LineDiscount, LineId},
    catalog::{Catalog, ProductId},
    discounts::{self, BumpDiscount},
};

/// Errors raised while resolving a bump's offers.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum OfferError {
    /// No bump is configured under this id.
    #[error("Bump {0} not found")]
    UnknownBump(BumpId),

    /// None of the bump's products can currently be offered.
    #[error("Bump {0} has no products available")]
    NoProducts(BumpId),
}

/// A product offered by a displayed bump.
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOffer<'a> {
    /// Offered product
    pub product: ProductId,

    /// Product name
    pub name: String,

    /// Thumbnail image URL
    pub image_url: Option<String>,

    /// Regular price, shown struck through when discounted
    pub regular_price: Money<'a, Currency>,

    /// Price the shopper pays per unit
    pub price: Money<'a, Currency>,

    /// Units added on acceptance
    pub quantity: u32,

    /// Discount to echo back when the offer is accepted
    pub discount: Option<BumpDiscount>,
}

impl BumpOffer<'_> {
    /// Whether the offer price is below the regular price.
    pub fn is_discounted(&self) -> bool {
        self.price.amount() < self.regular_price.amount()
    }
}

/// Offers for a bump, one per available product, in configuration order.
pub type Offers<'a> = SmallVec<[BumpOffer<'a>; 2]>;

/// Resolve a bump's products into offers.
///
/// Missing, non-purchasable and out-of-stock products are skipped. A discounted product's price
/// is resolved from its regular price; other products keep their current price.
///
/// # Errors
///
/// Returns [`OfferError::NoProducts`] if no product can be offered.
pub fn resolve_offers<'a, K: Catalog<'a> + ?Sized>(
    bump: &BumpConfig,
    catalog: &K,
) -> Result<Offers<'a>, OfferError> {
    let offers: Offers<'a> = bump
        .products
        .iter()
        .filter_map(|bump_product| {
            let Some(product) = catalog.product(bump_product.product) else {
                debug!(
                    bump = %bump.id,
                    product = %bump_product.product,
                    "skipping missing product"
                );
                return None;
            };

            if !product.is_available() {
                debug!(bump = %bump.id, product = %product.id, "skipping unavailable product");
                return None;
            }

            let price = match &bump_product.discount {
                Some(discount) => discounts::resolve(product.regular_price, Some(discount)),
                None => product.price,
            };

            Some(BumpOffer {
                product: product.id,
                name: product.name.clone(),
                image_url: product.image_url.clone(),
                regular_price: product.regular_price,
                price,
                quantity: bump_product.quantity,
                discount: bump_product.discount,
            })
        })
        .collect();

    if offers.is_empty() {
        return Err(OfferError::NoProducts(bump.id));
    }

    Ok(offers)
}

/// Add an accepted bump product to the cart.
///
/// `quantity` defaults to one. Discount metadata is attached only for a discount with a
/// positive magnitude, capturing the product's regular price as the line's original price. The
/// discounted price takes effect on the next [`discounts::apply_bump_discounts`].
///
/// # Errors
///
/// Returns [`CartError::ProductNotFound`] if the product is not in the catalog, or any error
/// the cart raises while adding it.
pub fn add_bump_product<'a, C, K>(
    cart: &mut C,
    catalog: &K,
    product: ProductId,
    quantity: Option<u32>,
    discount: Option<BumpDiscount>,
) -> Result<LineId, CartError>
where
    C: Cart<'a> + ?Sized,
    K: Catalog<'a> + ?Sized,
{
    let product = catalog
        .product(product)
        .ok_or(CartError::ProductNotFound(product))?;

    let quantity = quantity.unwrap_or(1);

    let meta = discount
        .filter(|discount| discount.magnitude() > Decimal::ZERO)
        .map(|discount| LineDiscount::new(discount, product.regular_price));
    let discounted = meta.is_some();

    let line = cart.add_item(product, quantity, meta)?;

    info!(
        product = %product.id,
        quantity,
        discounted,
        "added bump product to cart"
    );

    Ok(line)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::{
        bumps::BumpProduct,
        cart::{CartContext, memory::MemoryCart},
        catalog::{CatalogProduct, MemoryCatalog},
        discounts::apply_bump_discounts,
    };

    use super::*;

    fn gbp(minor: i64) -> Money<'static, Currency> {
        Money::from_minor(minor, GBP)
    }

    fn catalog() -> MemoryCatalog<'static> {
        let mut sold_out = CatalogProduct::new(ProductId(3), "Scarf", gbp(2_000));
        sold_out.in_stock = false;

        [
            CatalogProduct::new(ProductId(59), "Socks", gbp(500)),
            CatalogProduct::new(ProductId(187), "Beanie", gbp(1_200))
                .with_sale_price(gbp(1_000)),
            sold_out,
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn offers_skip_missing_and_unavailable_products() -> TestResult {
        let bump = BumpConfig::new(BumpId(1), "Bump 1")
            .with_product(BumpProduct::new(ProductId(3)))
            .with_product(BumpProduct::new(ProductId(404)))
            .with_product(BumpProduct::new(ProductId(59)));

        let offers = resolve_offers(&bump, &catalog())?;

        assert_eq!(offers.len(), 1);
        assert_eq!(offers.first().map(|offer| offer.product), Some(ProductId(59)));

        Ok(())
    }

    #[test]
    fn discounted_offer_is_priced_from_regular_price() -> TestResult {
        let bump = BumpConfig::new(BumpId(1), "Bump 1").with_product(
            BumpProduct::new(ProductId(187)).with_discount(BumpDiscount::fixed(Decimal::from(2))),
        );

        let offers = resolve_offers(&bump, &catalog())?;
        let offer = offers.first().ok_or("expected an offer")?;

        assert_eq!(offer.regular_price, gbp(1_200));
        assert_eq!(offer.price, gbp(1_000));
        assert!(offer.is_discounted());

        Ok(())
    }

    #[test]
    fn undiscounted_offer_keeps_current_price() -> TestResult {
        let bump =
            BumpConfig::new(BumpId(1), "Bump 1").with_product(BumpProduct::new(ProductId(187)));

        let offers = resolve_offers(&bump, &catalog())?;

        assert_eq!(offers.first().map(|offer| offer.price), Some(gbp(1_000)));

        Ok(())
    }

    #[test]
    fn bump_without_available_products_has_no_offers() {
        let bump =
            BumpConfig::new(BumpId(9), "Bump 9").with_product(BumpProduct::new(ProductId(3)));

        assert_eq!(
            resolve_offers(&bump, &catalog()),
            Err(OfferError::NoProducts(BumpId(9)))
        );
    }

    #[test]
    fn add_captures_regular_price() -> TestResult {
        let catalog = catalog();
        let mut cart = MemoryCart::new(GBP);

        let line = add_bump_product(
            &mut cart,
            &catalog,
            ProductId(187),
            None,
            Some(BumpDiscount::percent(Decimal::from(10))),
        )?;

        let meta = cart
            .line(line)
            .and_then(|line| line.discount().copied())
            .ok_or("expected discount metadata")?;

        assert_eq!(meta.original_price(), gbp(1_200));
        assert_eq!(cart.item_count(), 1);

        apply_bump_discounts(&mut cart)?;

        assert_eq!(cart.total(), gbp(1_080));

        Ok(())
    }

    #[test]
    fn zero_discount_attaches_no_metadata() -> TestResult {
        let catalog = catalog();
        let mut cart = MemoryCart::new(GBP);

        let line = add_bump_product(
            &mut cart,
            &catalog,
            ProductId(59),
            Some(2),
            Some(BumpDiscount::fixed(Decimal::ZERO)),
        )?;

        assert!(cart.line(line).is_some_and(|line| line.discount().is_none()));
        assert_eq!(cart.item_count(), 2);

        Ok(())
    }

    #[test]
    fn add_unknown_product_fails() {
        let catalog = catalog();
        let mut cart = MemoryCart::new(GBP);

        let result = add_bump_product(&mut cart, &catalog, ProductId(404), None, None);

        assert!(matches!(result, Err(CartError::ProductNotFound(ProductId(404)))));
        assert!(cart.is_empty());
    }

    #[test]
    fn add_out_of_stock_product_fails() {
        let catalog = catalog();
        let mut cart = MemoryCart::new(GBP);

        let result = add_bump_product(&mut cart, &catalog, ProductId(3), None, None);

        assert!(matches!(result, Err(CartError::OutOfStock(ProductId(3)))));
    }
}
