//! Order Bumps CLI
//!
//! Evaluates a fixture set's bumps against its cart and prints what the checkout page would
//! show. Accepted offers are added to the cart and the bumps are evaluated again.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use order_bumps::prelude::*;

use crate::config::CliConfig;

mod config;

/// CLI errors
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Product {0} is not offered by any displayed bump")]
    NotOffered(ProductId),
}

fn main() -> ExitCode {
    let config = match CliConfig::load() {
        Ok(config) => config,
        Err(err) => {
            let code = u8::try_from(err.exit_code()).unwrap_or(1);

            return match err.print() {
                Ok(()) => ExitCode::from(code),
                Err(_print_err) => ExitCode::FAILURE,
            };
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");

            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig) -> Result<(), CliError> {
    let fixture = Fixture::from_set_in(&config.fixtures_dir, &config.fixture)?;
    let catalog = fixture.catalog();
    let mut cart = fixture.cart()?;
    let mut bumps = fixture.order_bumps()?;

    if let Some(logic) = config.logic {
        bumps = bumps.with_default_logic(logic);
    }

    info!(fixture = %config.fixture, logic = %bumps.default_logic(), "evaluating order bumps");

    let mut out = io::stdout().lock();

    CheckoutReport::build(&bumps, &cart, catalog).write_to(&mut out)?;

    if config.accept.is_empty() {
        return Ok(());
    }

    for product in config.accepted_products() {
        let (quantity, discount) = displayed_offer(&bumps, &cart, catalog, product)
            .ok_or(CliError::NotOffered(product))?;

        add_bump_product(&mut cart, catalog, product, Some(quantity), discount)?;
    }

    let repriced = apply_bump_discounts(&mut cart)?;

    info!(repriced, "applied bump discounts");

    writeln!(out, "\nAfter accepting offers:")?;

    CheckoutReport::build(&bumps, &cart, catalog).write_to(&mut out)?;

    Ok(())
}

/// Quantity and discount of the first displayed offer for a product.
fn displayed_offer<'a>(
    bumps: &OrderBumps,
    cart: &MemoryCart<'a>,
    catalog: &MemoryCatalog<'a>,
    product: ProductId,
) -> Option<(u32, Option<BumpDiscount>)> {
    bumps.placements(cart).iter().find_map(|placement| {
        bumps
            .offers(placement.bump, catalog)
            .ok()?
            .into_iter()
            .find(|offer| offer.product == product)
            .map(|offer| (offer.quantity, offer.discount))
    })
}
