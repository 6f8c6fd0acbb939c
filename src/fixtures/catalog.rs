//! Catalog Fixtures

use jiff::civil::Date;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use serde::Deserialize;

use crate::{
    books::{EBook, FileFormat},
    fixtures::FixtureError,
    pricing::Price,
};

/// Wrapper for e-books in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// E-books in catalog order
    pub ebooks: Vec<EBookFixture>,
}

/// E-Book Fixture
#[derive(Debug, Deserialize)]
pub struct EBookFixture {
    /// Key other fixture files use to refer to this e-book
    pub key: String,

    /// Title
    pub title: String,

    /// Author
    pub author: String,

    /// Publication date (e.g., "2022-01-01")
    pub publication_date: Date,

    /// Genre
    pub genre: String,

    /// Price (e.g., "29.99 USD")
    pub price: String,

    /// Delivery format
    pub file_format: FileFormat,
}

impl EBookFixture {
    /// Build the e-book this entry describes.
    ///
    /// # Errors
    ///
    /// Returns an error if the price cannot be parsed.
    pub fn try_into_ebook(self) -> Result<EBook, FixtureError> {
        let price = parse_price(&self.price)?;

        Ok(EBook::new(
            self.title,
            self.author,
            self.publication_date,
            self.genre,
            price,
            self.file_format,
        ))
    }
}

/// Parse price string (e.g., "29.99 USD") into a price
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal, or if the currency code is not recognized.
pub fn parse_price(s: &str) -> Result<Price, FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    let [amount, currency_code] = parts.as_slice() else {
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

    if minor_units < 0 {
        return Err(FixtureError::InvalidPrice(s.to_string()));
    }

    Ok(Money::from_minor(minor_units, currency(currency_code)?))
}

fn currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
