//! E-Bookstore CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use decimal_percentage::Percentage;
use jiff::Zoned;
use thiserror::Error;
use tracing::info;

use ebookstore::{
    cart::CartError,
    config::{Command, Config},
    fixtures::{Fixture, FixtureError},
    invoice::InvoiceError,
    orders::OrderError,
    logging::{self, LoggingError},
};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Invoice(#[from] InvoiceError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("no cart at index {0}")]
    NoSuchCart(usize),

    #[error("{0}'s Shopping Cart is empty.")]
    EmptyCart(String),
}

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => error.exit(),
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            #[expect(
                clippy::print_stderr,
                reason = "errors are reported to the user even when logging is filtered out"
            )]
            {
                eprintln!("error: {error}");
            }

            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), AppError> {
    logging::init(&config.log_level)?;

    let mut fixture = Fixture::from_set_in(config.fixtures_dir.clone(), &config.fixture)?;

    info!(
        fixture = %config.fixture,
        ebooks = fixture.catalog().len(),
        customers = fixture.customers().len(),
        carts = fixture.carts().len(),
        "loaded fixture set"
    );

    let mut out = io::stdout().lock();

    match &config.command {
        Command::Catalog => fixture.catalog().write_table(&mut out)?,
        Command::Customers => writeln!(out, "{}", fixture.customers())?,
        Command::Cart { index } => {
            let cart = fixture
                .carts()
                .get(*index)
                .ok_or(AppError::NoSuchCart(*index))?;

            writeln!(
                out,
                "{}",
                cart.summary(fixture.catalog(), fixture.customers())?
            )?;
        }
        Command::Invoice { index, date } => {
            let cart = fixture
                .carts()
                .get(*index)
                .cloned()
                .ok_or(AppError::NoSuchCart(*index))?
                .with_policy(config.pricing_policy());

            let order_date = date.unwrap_or_else(|| Zoned::now().date());
            let order = cart
                .create_order(order_date, Percentage::from(config.vat_rate))
                .map_err(|error| match error {
                    CartError::EmptyCart(customer) => AppError::EmptyCart(
                        fixture
                            .customers()
                            .get(customer)
                            .map_or_else(String::new, |customer| customer.name().to_string()),
                    ),
                    other => other.into(),
                })?;

            order.generate_invoice(&mut out, fixture.catalog(), fixture.customers())?;

            for unit in order.ebooks() {
                let ebook = fixture
                    .catalog()
                    .get(unit.ebook())
                    .cloned()
                    .ok_or(OrderError::UnknownEBook(unit.ebook()))?;

                writeln!(out, "{}", ebook.deliver())?;

                if let Some(customer) = fixture.customers_mut().get_mut(order.customer()) {
                    customer.place_order(&ebook);
                }
            }
        }
    }

    Ok(())
}
