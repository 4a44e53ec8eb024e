//! CLI configuration module

use std::path::PathBuf;

use clap::Parser;

use order_bumps::{catalog::ProductId, conditions::Logic};

/// Order bumps CLI configuration
#[derive(Debug, Parser)]
#[command(
    name = "order-bumps",
    about = "Evaluate checkout order bumps against a fixture set",
    long_about = None
)]
pub struct CliConfig {
    /// Fixture set name (catalog, cart and bumps files sharing this name)
    #[arg(short, long, env = "ORDER_BUMPS_FIXTURE", default_value = "default")]
    pub fixture: String,

    /// Directory holding the `catalog/`, `carts/` and `bumps/` fixture folders
    #[arg(
        short = 'd',
        long,
        env = "ORDER_BUMPS_FIXTURES_DIR",
        default_value = "./fixtures"
    )]
    pub fixtures_dir: PathBuf,

    /// Override the configured default logic (AND, OR)
    #[arg(long, value_parser = parse_logic)]
    pub logic: Option<Logic>,

    /// Accept the displayed offer for a product id; repeatable
    #[arg(short, long = "accept", value_name = "PRODUCT_ID")]
    pub accept: Vec<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Products whose offers should be accepted, in order.
    pub fn accepted_products(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.accept.iter().copied().map(ProductId)
    }
}

fn parse_logic(value: &str) -> Result<Logic, String> {
    if value.eq_ignore_ascii_case("and") || value.eq_ignore_ascii_case("or") {
        Ok(Logic::parse(value))
    } else {
        Err(format!("expected AND or OR, got `{value}`"))
    }
}
