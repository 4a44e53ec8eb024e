//! Discounts
//!
//! Resolution of bump discounts into line prices.
//!
//! A bump product may carry a discount descriptor: a kind (`fixed` or `percent`) and a
//! magnitude. Resolving it against a base price yields the price the shopper pays for each unit.
//! Resolution is pure. Writing the result back to the cart is [`apply_bump_discounts`].

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::cart::{Cart, CartError, LineId};

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Fixed amount subtraction overflowed.
    #[error("fixed discount amount overflowed")]
    AmountOverflow,
}

/// How a bump discount reduces the base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountKind {
    /// Subtract a fixed amount in major currency units (e.g. "£2 off").
    Fixed,

    /// Take a percentage off, with the magnitude in percentage points (e.g. "10% off").
    Percent,
}

impl DiscountKind {
    /// Parse a configured discount kind. Anything other than `fixed` or `percent` is not a
    /// discount.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "fixed" => Some(Self::Fixed),
            "percent" => Some(Self::Percent),
            _ => None,
        }
    }

    /// Configuration name of the kind.
    #[must_use]
    pub const fn to_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Percent => "percent",
        }
    }
}

/// Discount descriptor attached to a bump product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpDiscount {
    kind: DiscountKind,
    magnitude: Decimal,
}

impl BumpDiscount {
    /// Create a discount of the given kind and magnitude.
    pub fn new(kind: DiscountKind, magnitude: Decimal) -> Self {
        Self { kind, magnitude }
    }

    /// A fixed amount off, in major units.
    pub fn fixed(amount: Decimal) -> Self {
        Self::new(DiscountKind::Fixed, amount)
    }

    /// A percentage off, in percentage points.
    pub fn percent(points: Decimal) -> Self {
        Self::new(DiscountKind::Percent, points)
    }

    /// Build a discount from its configured kind name and magnitude.
    ///
    /// Returns `None` for unrecognized kinds, which leave the price untouched.
    pub fn from_parts(kind: &str, magnitude: Decimal) -> Option<Self> {
        DiscountKind::parse(kind).map(|kind| Self::new(kind, magnitude))
    }

    /// Discount kind
    pub fn kind(&self) -> DiscountKind {
        self.kind
    }

    /// Discount magnitude
    pub fn magnitude(&self) -> Decimal {
        self.magnitude
    }

    fn percentage(&self) -> Result<Percentage, DiscountError> {
        let fraction = self
            .magnitude
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|fraction| fraction.to_f64())
            .filter(|fraction| fraction.is_finite())
            .ok_or(DiscountError::PercentConversion)?;

        Ok(Percentage::from(fraction))
    }
}

/// Calculate the discount amount in minor units based on a percentage and a minor unit amount.
///
/// # Errors
///
/// Returns [`DiscountError::PercentConversion`] if the calculation overflows or cannot be
/// represented.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, DiscountError> {
    let minor = Decimal::from_i64(minor).ok_or(DiscountError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage doesn't expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(DiscountError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(DiscountError::PercentConversion)
}

/// Resolve a discount against a base price.
///
/// - `fixed`: `max(0, base - magnitude)`
/// - `percent`: `base * (1 - magnitude / 100)`, rounded to minor units. Magnitudes above 100
///   are not clamped and produce negative prices.
///
/// # Errors
///
/// Returns a [`DiscountError`] if the arithmetic overflows.
pub fn try_resolve<'a>(
    base: Money<'a, Currency>,
    discount: &BumpDiscount,
) -> Result<Money<'a, Currency>, DiscountError> {
    match discount.kind() {
        DiscountKind::Fixed => {
            let discounted = base
                .amount()
                .checked_sub(discount.magnitude())
                .ok_or(DiscountError::AmountOverflow)?;

            Ok(Money::from_decimal(
                discounted.max(Decimal::ZERO),
                base.currency(),
            ))
        }
        DiscountKind::Percent => {
            let original_minor = base.to_minor_units();
            let discounted_minor = original_minor
                .checked_sub(percent_of_minor(&discount.percentage()?, original_minor)?)
                .ok_or(DiscountError::PercentConversion)?;

            Ok(Money::from_minor(discounted_minor, base.currency()))
        }
    }
}

/// Resolve the final unit price for a base price and an optional discount.
///
/// Without a discount the base price passes through. If the arithmetic cannot be represented
/// the base price is kept.
pub fn resolve<'a>(
    base: Money<'a, Currency>,
    discount: Option<&BumpDiscount>,
) -> Money<'a, Currency> {
    let Some(discount) = discount else {
        return base;
    };

    try_resolve(base, discount).unwrap_or_else(|err| {
        warn!(
            %err,
            kind = discount.kind().to_str(),
            magnitude = %discount.magnitude(),
            "discount could not be resolved, keeping base price"
        );

        base
    })
}

/// Reprice every cart line carrying bump discount metadata.
///
/// Each line is resolved from its captured original price, so running this again before every
/// total recalculation never compounds discounts. Returns the number of lines repriced.
///
/// # Errors
///
/// Returns a [`CartError`] if the cart refuses a price update.
pub fn apply_bump_discounts<'a, C: Cart<'a>>(cart: &mut C) -> Result<usize, CartError> {
    let repriced: SmallVec<[(LineId, Money<'a, Currency>); 4]> = cart
        .lines()
        .filter_map(|(line, cart_line)| {
            cart_line.discount().map(|meta| {
                (
                    line,
                    resolve(meta.original_price(), Some(meta.discount())),
                )
            })
        })
        .collect();

    let count = repriced.len();

    for (line, price) in repriced {
        cart.set_effective_price(line, price)?;
    }

    Ok(count)
}
