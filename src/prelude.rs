//! E-Bookstore prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    books::{Book, EBook, EBookKey, EBookUpdate, FileFormat, UnknownFileFormat},
    cart::{CartError, LineItem, ShoppingCart},
    catalog::Catalog,
    customers::{Customer, CustomerKey, CustomerList, CustomerListError, CustomerUpdate},
    fixtures::{Fixture, FixtureError},
    invoice::{Invoice, InvoiceError, InvoiceLine},
    orders::{Order, OrderError, OrderUnit},
    pricing::{Price, PricingError, PricingPolicy},
};
