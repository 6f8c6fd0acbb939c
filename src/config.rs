//! Command line and environment configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use decimal_percentage::Percentage;
use jiff::civil::Date;
use rust_decimal::Decimal;

use crate::pricing::{DEFAULT_BULK_THRESHOLD, PricingPolicy};

/// E-bookstore configuration
#[derive(Debug, Parser)]
#[command(name = "ebookstore", about = "E-bookstore catalog, carts and invoices", long_about = None)]
pub struct Config {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the fixture sets
    #[arg(long, env = "EBOOKSTORE_FIXTURES_DIR", default_value = "./fixtures", global = true)]
    pub fixtures_dir: PathBuf,

    /// Fixture set to load
    #[arg(short, long, env = "EBOOKSTORE_FIXTURE", default_value = "bookstore", global = true)]
    pub fixture: String,

    /// VAT rate as a fraction
    #[arg(long, env = "EBOOKSTORE_VAT_RATE", default_value = "0.08", global = true)]
    pub vat_rate: Decimal,

    /// Loyalty discount as a fraction
    #[arg(long, env = "EBOOKSTORE_LOYALTY_DISCOUNT", default_value = "0.10", global = true)]
    pub loyalty_discount: Decimal,

    /// Bulk discount as a fraction
    #[arg(long, env = "EBOOKSTORE_BULK_DISCOUNT", default_value = "0.20", global = true)]
    pub bulk_discount: Decimal,

    /// Units an order needs for the bulk discount
    #[arg(long, env = "EBOOKSTORE_BULK_THRESHOLD", default_value_t = DEFAULT_BULK_THRESHOLD, global = true)]
    pub bulk_threshold: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,
}

/// Commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the catalog
    Catalog,

    /// List the customers
    Customers,

    /// Show a cart from the fixture set
    Cart {
        /// Position of the cart in the fixture set
        #[arg(long, default_value_t = 0)]
        index: usize,
    },

    /// Check out a cart and print its invoice
    Invoice {
        /// Position of the cart in the fixture set
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Order date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<Date>,
    },
}

impl Config {
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

    /// Pricing policy built from the configured rates.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy {
            vat_rate: Percentage::from(self.vat_rate),
            loyalty_discount: Percentage::from(self.loyalty_discount),
            bulk_discount: Percentage::from(self.bulk_discount),
            bulk_threshold: self.bulk_threshold,
        }
    }
}
