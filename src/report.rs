//! Checkout Report
//!
//! Table of the bumps displayed for a cart and the offers each one carries.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    bumps::{
        display::Placement,
        offers::{OfferError, Offers},
    },
    cart::{CartContext, CartSnapshot},
    catalog::Catalog,
    checkout::OrderBumps,
    discounts::{BumpDiscount, DiscountKind},
};

/// Errors that can occur when writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A displayed bump with its resolved offers
#[derive(Debug, Clone)]
pub struct ReportSection<'a> {
    /// Where the bump renders
    pub placement: Placement,

    /// Bump name
    pub name: String,

    /// Offers, or why there are none
    pub offers: Result<Offers<'a>, OfferError>,
}

/// Displayed bumps for one cart
#[derive(Debug, Clone)]
pub struct CheckoutReport<'a> {
    cart: CartSnapshot<'a>,
    sections: Vec<ReportSection<'a>>,
}

impl<'a> CheckoutReport<'a> {
    /// Evaluate every bump against the cart and resolve offers for the displayed ones.
    pub fn build<C, K>(bumps: &OrderBumps, cart: &'a C, catalog: &K) -> Self
    where
        C: CartContext + ?Sized,
        K: Catalog<'a> + ?Sized,
    {
        let sections = bumps
            .placements(cart)
            .into_iter()
            .map(|placement| {
                let name = bumps
                    .bump(placement.bump)
                    .map(|bump| bump.name.clone())
                    .unwrap_or_default();

                let offers = bumps.offers(placement.bump, catalog);

                ReportSection {
                    placement,
                    name,
                    offers,
                }
            })
            .collect();

        Self {
            cart: CartSnapshot::capture(cart),
            sections,
        }
    }

    /// Displayed bumps, in configuration order.
    pub fn sections(&self) -> &[ReportSection<'a>] {
        &self.sections
    }

    /// Cart readings the bumps were evaluated against.
    pub fn cart(&self) -> &CartSnapshot<'a> {
        &self.cart
    }

    /// Writes the report as a table followed by a cart summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReportError> {
        if self.sections.is_empty() {
            writeln!(out, "\nNo order bumps to display.")?;
        } else {
            let mut builder = Builder::default();

            builder.push_record([
                "Bump",
                "Slot",
                "Layout",
                "Product",
                "Regular Price",
                "Price",
                "Qty",
                "Discount",
            ]);

            for section in &self.sections {
                append_section_rows(&mut builder, section);
            }

            let mut table = builder.build();

            table.with(Style::modern_rounded());
            table.modify(Rows::first(), Color::BOLD);
            table.modify(Columns::new(4..7), Alignment::right());

            writeln!(out, "\n{table}")?;
        }

        writeln!(
            out,
            " Items: {}  Subtotal: {}  Total: {}  Logged in: {}",
            self.cart.item_count(),
            self.cart.subtotal(),
            self.cart.total(),
            if self.cart.is_user_logged_in() { "yes" } else { "no" },
        )?;

        Ok(())
    }
}

fn append_section_rows(builder: &mut Builder, section: &ReportSection<'_>) {
    let bump = format!("#{} {}", section.placement.bump, section.name);
    let slot = section.placement.slot().to_string();
    let layout = section.placement.layout.as_str().to_string();

    match &section.offers {
        Ok(offers) => {
            for offer in offers {
                builder.push_record([
                    bump.clone(),
                    slot.clone(),
                    layout.clone(),
                    format!("{} ({})", offer.name, offer.product),
                    offer.regular_price.to_string(),
                    offer.price.to_string(),
                    offer.quantity.to_string(),
                    offer.discount.as_ref().map(discount_label).unwrap_or_default(),
                ]);
            }
        }
        Err(err) => {
            builder.push_record([
                bump,
                slot,
                layout,
                err.to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
            ]);
        }
    }
}

fn discount_label(discount: &BumpDiscount) -> String {
    match discount.kind() {
        DiscountKind::Fixed => format!("{} off", discount.magnitude()),
        DiscountKind::Percent => format!("{}%", discount.magnitude()),
    }
}
