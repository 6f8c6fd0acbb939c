//! Invoice

use std::{fmt, io};

use decimal_percentage::Percentage;
use jiff::civil::Date;
use thiserror::Error;

use crate::{
    orders::OrderError,
    pricing::{Price, display_amount, percent_points},
};

/// Errors that can occur when producing an invoice.
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// Error pricing the order.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Error writing the invoice.
    #[error("failed to write invoice: {0}")]
    Io(#[from] io::Error),
}

/// A single copy listed on an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    title: String,
    price: Price,
}

impl InvoiceLine {
    /// Create an invoice line.
    pub fn new(title: impl Into<String>, price: Price) -> Self {
        Self {
            title: title.into(),
            price,
        }
    }

    /// Title of the e-book.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Price charged for the copy, before discounts.
    pub fn price(&self) -> Price {
        self.price
    }
}

/// A priced order, ready to print.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub(crate) order_date: Date,
    pub(crate) customer_name: String,
    pub(crate) lines: Vec<InvoiceLine>,
    pub(crate) subtotal: Price,
    pub(crate) vat_rate: Percentage,
    pub(crate) vat_amount: Price,
    pub(crate) discounted: Price,
    pub(crate) grand_total: Price,
}

impl Invoice {
    /// Order date
    pub fn order_date(&self) -> Date {
        self.order_date
    }

    /// Name of the ordering customer.
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// One line per purchased copy.
    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    /// Total before discounts and VAT.
    pub fn subtotal(&self) -> Price {
        self.subtotal
    }

    /// VAT rate
    pub fn vat_rate(&self) -> Percentage {
        self.vat_rate
    }

    /// VAT charged on the subtotal.
    pub fn vat_amount(&self) -> Price {
        self.vat_amount
    }

    /// Subtotal after discounts.
    pub fn discounted(&self) -> Price {
        self.discounted
    }

    /// Discounted subtotal plus VAT.
    pub fn grand_total(&self) -> Price {
        self.grand_total
    }

    /// Write the invoice as printed at checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), InvoiceError> {
        writeln!(out, "Order Invoice:")?;
        writeln!(out, "Order Date: {}", self.order_date)?;
        writeln!(out, "Items:")?;

        for line in &self.lines {
            writeln!(out, "- {} - {:.2}", line.title, display_amount(&line.price))?;
        }

        writeln!(out, "Subtotal: {:.2}", display_amount(&self.subtotal))?;
        writeln!(
            out,
            "VAT ({:.2}%): {:.2}",
            percent_points(self.vat_rate),
            display_amount(&self.vat_amount)
        )?;
        writeln!(out, "Total: {:.2}", display_amount(&self.grand_total))?;

        Ok(())
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Order Invoice:")?;
        writeln!(f, "Order Date: {}", self.order_date)?;
        writeln!(f, "Customer: {}", self.customer_name)?;
        writeln!(f, "Items:")?;

        for line in &self.lines {
            writeln!(f, "- {} - Price: {:.2}", line.title, display_amount(&line.price))?;
        }

        writeln!(f, "Subtotal: {:.2}", display_amount(&self.subtotal))?;
        writeln!(
            f,
            "VAT ({:.2}%): {:.2}",
            percent_points(self.vat_rate),
            display_amount(&self.vat_amount)
        )?;
        write!(
            f,
            "Total after discounts: {:.2}",
            display_amount(&self.grand_total)
        )
    }
}
