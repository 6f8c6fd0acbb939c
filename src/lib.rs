//! E-Bookstore
//!
//! Catalog, customer accounts, shopping carts and priced orders for a shop selling
//! e-books, with bulk and loyalty discounts and VAT on every invoice.

pub mod books;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod customers;
pub mod fixtures;
pub mod invoice;
pub mod logging;
pub mod orders;
pub mod prelude;
pub mod pricing;
