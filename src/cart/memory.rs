//! In-memory Cart

use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;

use crate::{
    cart::{Cart, CartContext, CartError, CartLine, LineDiscount, LineId},
    catalog::CatalogProduct,
};

/// Single-currency cart held in memory.
///
/// Each added product gets its own line. Totals are recomputed from the lines on every read.
#[derive(Debug)]
pub struct MemoryCart<'a> {
    lines: SlotMap<LineId, CartLine<'a>>,
    currency: &'a Currency,
    logged_in: bool,
}

impl<'a> MemoryCart<'a> {
    /// Create an empty cart for an anonymous shopper.
    pub fn new(currency: &'a Currency) -> Self {
        Self {
            lines: SlotMap::with_key(),
            currency,
            logged_in: false,
        }
    }

    /// Mark the shopper as logged in or out.
    pub fn set_logged_in(&mut self, logged_in: bool) {
        self.logged_in = logged_in;
    }

    /// Get a line by key.
    pub fn line(&self, line: LineId) -> Option<&CartLine<'a>> {
        self.lines.get(line)
    }

    /// Number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    fn sum_lines(
        &self,
        unit_price: impl for<'l> Fn(&'l CartLine<'a>) -> &'l Money<'a, Currency>,
    ) -> i64 {
        self.lines.values().fold(0_i64, |acc, line| {
            let line_total = unit_price(line)
                .to_minor_units()
                .saturating_mul(i64::from(line.quantity()));

            acc.saturating_add(line_total)
        })
    }
}

impl CartContext for MemoryCart<'_> {
    fn total(&self) -> Money<'_, Currency> {
        Money::from_minor(self.sum_lines(CartLine::effective_price), self.currency)
    }

    fn subtotal(&self) -> Money<'_, Currency> {
        Money::from_minor(self.sum_lines(CartLine::base_price), self.currency)
    }

    fn item_count(&self) -> u64 {
        self.lines
            .values()
            .map(|line| u64::from(line.quantity()))
            .sum()
    }

    fn is_user_logged_in(&self) -> bool {
        self.logged_in
    }
}

impl<'a> Cart<'a> for MemoryCart<'a> {
    fn add_item(
        &mut self,
        product: &CatalogProduct<'a>,
        quantity: u32,
        discount: Option<LineDiscount<'a>>,
    ) -> Result<LineId, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity(product.id));
        }

        if !product.purchasable {
            return Err(CartError::NotPurchasable(product.id));
        }

        if !product.in_stock {
            return Err(CartError::OutOfStock(product.id));
        }

        let product_currency = product.price.currency();
        if product_currency != self.currency {
            return Err(CartError::CurrencyMismatch(
                product.id,
                product_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        let line = CartLine::new(product.id, quantity, product.price, discount);

        Ok(self.lines.insert(line))
    }

    fn lines<'s>(&'s self) -> impl Iterator<Item = (LineId, &'s CartLine<'a>)>
    where
        'a: 's,
    {
        self.lines.iter()
    }

    fn set_effective_price(
        &mut self,
        line: LineId,
        price: Money<'a, Currency>,
    ) -> Result<(), CartError> {
        let cart_line = self
            .lines
            .get_mut(line)
            .ok_or(CartError::LineNotFound(line))?;

        cart_line.set_effective_price(price);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use crate::catalog::ProductId;

    use super::*;

    fn beanie<'a>() -> CatalogProduct<'a> {
        CatalogProduct::new(ProductId(187), "Beanie", Money::from_minor(1200, GBP))
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = MemoryCart::new(GBP);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Money::from_minor(0, GBP));
        assert_eq!(cart.subtotal(), Money::from_minor(0, GBP));
        assert_eq!(cart.item_count(), 0);
        assert!(!cart.is_user_logged_in());
    }

    #[test]
    fn totals_multiply_by_quantity() -> TestResult {
        let mut cart = MemoryCart::new(GBP);
        let socks = CatalogProduct::new(ProductId(59), "Socks", Money::from_minor(500, GBP));

        cart.add_item(&beanie(), 1, None)?;
        cart.add_item(&socks, 3, None)?;

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), Money::from_minor(2700, GBP));
        assert_eq!(cart.total(), Money::from_minor(2700, GBP));

        Ok(())
    }

    #[test]
    fn effective_price_changes_total_but_not_subtotal() -> TestResult {
        let mut cart = MemoryCart::new(GBP);
        let line = cart.add_item(&beanie(), 2, None)?;

        cart.set_effective_price(line, Money::from_minor(1000, GBP))?;

        assert_eq!(cart.total(), Money::from_minor(2000, GBP));
        assert_eq!(cart.subtotal(), Money::from_minor(2400, GBP));

        Ok(())
    }

    #[test]
    fn lines_iterate_in_insertion_order() -> TestResult {
        let mut cart = MemoryCart::new(GBP);
        let socks = CatalogProduct::new(ProductId(59), "Socks", Money::from_minor(500, GBP));

        let first = cart.add_item(&beanie(), 1, None)?;
        let second = cart.add_item(&socks, 2, None)?;

        let lines: Vec<(LineId, ProductId, u32)> = cart
            .lines()
            .map(|(id, line)| (id, line.product(), line.quantity()))
            .collect();

        assert_eq!(lines, vec![(first, ProductId(187), 1), (second, ProductId(59), 2)]);

        Ok(())
    }

    #[test]
    fn rejects_unavailable_products() {
        let mut cart = MemoryCart::new(GBP);

        let mut sold_out = beanie();
        sold_out.in_stock = false;

        let mut hidden = beanie();
        hidden.purchasable = false;

        assert!(matches!(
            cart.add_item(&sold_out, 1, None),
            Err(CartError::OutOfStock(ProductId(187)))
        ));
        assert!(matches!(
            cart.add_item(&hidden, 1, None),
            Err(CartError::NotPurchasable(ProductId(187)))
        ));
        assert!(matches!(
            cart.add_item(&beanie(), 0, None),
            Err(CartError::ZeroQuantity(ProductId(187)))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn rejects_other_currencies() {
        let mut cart = MemoryCart::new(GBP);
        let dollars = CatalogProduct::new(ProductId(1), "Cap", Money::from_minor(900, USD));

        let result = cart.add_item(&dollars, 1, None);

        assert!(
            matches!(
                result,
                Err(CartError::CurrencyMismatch(ProductId(1), found, expected))
                    if found == USD.iso_alpha_code && expected == GBP.iso_alpha_code
            ),
            "expected CurrencyMismatch error, got {result:?}"
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn repricing_a_missing_line_errors() {
        let mut cart = MemoryCart::new(GBP);

        assert!(matches!(
            cart.set_effective_price(LineId::default(), Money::from_minor(1, GBP)),
            Err(CartError::LineNotFound(_))
        ));
    }

    #[test]
    fn logged_in_flag() {
        let mut cart = MemoryCart::new(GBP);
        cart.set_logged_in(true);

        assert!(cart.is_user_logged_in());
    }
}
