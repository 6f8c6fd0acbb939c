//! Fixtures
//!
//! YAML fixture sets describing a catalog, its customers and their carts.
//! A set named `bookstore` lives in `catalog/bookstore.yml`,
//! `customers/bookstore.yml` and `carts/bookstore.yml` under the base path.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    books::EBookKey,
    cart::{CartError, ShoppingCart},
    catalog::Catalog,
    customers::{Customer, CustomerKey, CustomerList},
    fixtures::{carts::CartsFixture, catalog::CatalogFixture, customers::CustomersFixture},
};

pub mod carts;
pub mod catalog;
pub mod customers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between e-books
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Two fixture entries share a key
    #[error("Duplicate fixture key: {0}")]
    DuplicateKey(String),

    /// E-book not found
    #[error("E-book not found: {0}")]
    EBookNotFound(String),

    /// Customer not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// No e-books loaded yet
    #[error("No e-books loaded yet; currency unknown")]
    NoCurrency,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    catalog: Catalog,
    customers: CustomerList,
    carts: Vec<ShoppingCart>,

    /// String key -> store key mappings for lookups
    ebook_keys: FxHashMap<String, EBookKey>,
    customer_keys: FxHashMap<String, CustomerKey>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            customers: CustomerList::new(),
            carts: Vec::new(),
            ebook_keys: FxHashMap::default(),
            customer_keys: FxHashMap::default(),
            currency: None,
        }
    }

    /// Load a complete fixture set from the default base path.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the set's files cannot be read or resolved.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from `base_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the set's files cannot be read or resolved.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_catalog(name)?
            .load_customers(name)?
            .load_carts(name)?;

        Ok(fixture)
    }

    /// Load e-books from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a key repeats, or
    /// prices use more than one currency.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CatalogFixture = self.read("catalog", name)?;

        for entry in fixture.ebooks {
            let key = entry.key.clone();
            let ebook = entry.try_into_ebook()?;
            let currency = ebook.price().currency();

            // Validate currency consistency
            match self.currency {
                Some(existing) if existing != currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => self.currency = Some(currency),
            }

            if self.ebook_keys.contains_key(&key) {
                return Err(FixtureError::DuplicateKey(key));
            }

            let ebook_key = self.catalog.add_item(ebook);
            self.ebook_keys.insert(key, ebook_key);
        }

        Ok(self)
    }

    /// Load customers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a key repeats.
    pub fn load_customers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CustomersFixture = self.read("customers", name)?;

        for entry in fixture.customers {
            if self.customer_keys.contains_key(&entry.key) {
                return Err(FixtureError::DuplicateKey(entry.key));
            }

            let key = entry.key.clone();
            let customer: Customer = entry.into();

            customer.create_account();

            let customer_key = self.customers.add_customer(customer);

            self.customer_keys.insert(key, customer_key);
        }

        Ok(self)
    }

    /// Load carts from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, no catalog has been
    /// loaded, or a referenced customer or e-book doesn't exist.
    pub fn load_carts(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartsFixture = self.read("carts", name)?;
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        for entry in fixture.carts {
            let mut cart = ShoppingCart::new(self.customer_key(&entry.customer)?, currency);

            for item in entry.items {
                cart.add_item(&self.catalog, self.ebook_key(&item.ebook)?, item.quantity)?;
            }

            self.carts.push(cart);
        }

        Ok(self)
    }

    fn read<T: serde::de::DeserializeOwned>(
        &self,
        kind: &str,
        name: &str,
    ) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Look up an e-book by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::EBookNotFound`] if no e-book uses `key`.
    pub fn ebook_key(&self, key: &str) -> Result<EBookKey, FixtureError> {
        self.ebook_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::EBookNotFound(key.to_string()))
    }

    /// Look up a customer by its fixture key.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::CustomerNotFound`] if no customer uses `key`.
    pub fn customer_key(&self, key: &str) -> Result<CustomerKey, FixtureError> {
        self.customer_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::CustomerNotFound(key.to_string()))
    }

    /// The loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The loaded catalog, mutably.
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// The loaded customers.
    pub fn customers(&self) -> &CustomerList {
        &self.customers
    }

    /// The loaded customers, mutably.
    pub fn customers_mut(&mut self) -> &mut CustomerList {
        &mut self.customers
    }

    /// The loaded carts, in file order.
    pub fn carts(&self) -> &[ShoppingCart] {
        &self.carts
    }

    /// Currency shared by every price in the set.
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
