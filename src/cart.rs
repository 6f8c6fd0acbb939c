//! Shopping Cart

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    books::EBookKey,
    catalog::Catalog,
    customers::{CustomerKey, CustomerList},
    orders::{Order, OrderError, OrderUnit},
    pricing::{self, Price, PricingError, PricingPolicy, display_amount},
};

/// Errors related to cart bookkeeping and checkout.
#[derive(Debug, Error)]
pub enum CartError {
    /// The customer's cart has no line items to order.
    #[error("shopping cart is empty")]
    EmptyCart(CustomerKey),

    /// The e-book is not in the catalog.
    #[error("e-book not found in catalog")]
    UnknownEBook(EBookKey),

    /// The cart's customer is not in the customer list.
    #[error("customer not found")]
    UnknownCustomer(CustomerKey),

    /// Error building the order.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Error calculating a line or cart total.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// An e-book and how many copies of it are in the cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    ebook: EBookKey,
    quantity: u32,
    unit_price: Price,
}

impl LineItem {
    /// The e-book on this line.
    pub fn ebook(&self) -> EBookKey {
        self.ebook
    }

    /// Number of copies.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of one copy when the line was added.
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Price of all copies on this line.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
    pub fn line_total(&self) -> Result<Price, PricingError> {
        pricing::line_total(self.unit_price, self.quantity)
    }
}

/// A customer's cart.
///
/// `total_price` is kept in step with the line items as they are added and removed.
#[derive(Debug, Clone)]
pub struct ShoppingCart {
    customer: CustomerKey,
    items: SmallVec<[LineItem; 8]>,
    total_price: Price,
    policy: PricingPolicy,
}

impl ShoppingCart {
    /// Create an empty cart for `customer`.
    pub fn new(customer: CustomerKey, currency: &'static Currency) -> Self {
        Self {
            customer,
            items: SmallVec::new(),
            total_price: Money::from_minor(0, currency),
            policy: PricingPolicy::default(),
        }
    }

    /// Use `policy` for the loyalty discount and for orders created from this cart.
    #[must_use]
    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The customer the cart belongs to.
    pub fn customer(&self) -> CustomerKey {
        self.customer
    }

    /// Hand the cart to another customer.
    pub fn set_customer(&mut self, customer: CustomerKey) {
        self.customer = customer;
    }

    /// Line items, in the order they were added.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Running total of the cart.
    pub fn total_price(&self) -> Price {
        self.total_price
    }

    /// Pricing policy for this cart.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.total_price.currency()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a line for `quantity` copies of `ebook`.
    ///
    /// A second line is created if the e-book is already in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the e-book is not in `catalog`, its currency differs from the
    /// cart's, or the line total overflows.
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        ebook: EBookKey,
        quantity: u32,
    ) -> Result<(), CartError> {
        let unit_price = unit_price(catalog, ebook)?;

        self.push_line(LineItem {
            ebook,
            quantity,
            unit_price,
        })
    }

    /// Remove the first line for `ebook`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the line total cannot be taken off the cart total.
    pub fn remove_item(&mut self, ebook: EBookKey) -> Result<Option<LineItem>, CartError> {
        let Some(idx) = self.items.iter().position(|line| line.ebook == ebook) else {
            return Ok(None);
        };

        let line = self.items.remove(idx);
        self.total_price = self.total_price.sub(line.line_total()?)?;

        debug!(?ebook, quantity = line.quantity, "removed cart line");

        Ok(Some(line))
    }

    /// Replace the quantity of `ebook`, moving its line to the end of the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the e-book is not in `catalog` or the totals cannot be updated.
    pub fn update_quantity(
        &mut self,
        catalog: &Catalog,
        ebook: EBookKey,
        quantity: u32,
    ) -> Result<(), CartError> {
        let unit_price = unit_price(catalog, ebook)?;

        self.remove_item(ebook)?;

        self.push_line(LineItem {
            ebook,
            quantity,
            unit_price,
        })
    }

    /// Take the loyalty discount off the cart total if the customer holds any points.
    ///
    /// Returns whether the discount was applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is unknown or the discounted total overflows.
    pub fn apply_loyalty_discount(&mut self, customers: &CustomerList) -> Result<bool, CartError> {
        let customer = customers
            .get(self.customer)
            .ok_or(CartError::UnknownCustomer(self.customer))?;

        if !customer.has_loyalty_points() {
            return Ok(false);
        }

        self.total_price = pricing::discount(self.total_price, self.policy.loyalty_discount)?;

        Ok(true)
    }

    /// Turn the cart into an order with one entry per copy.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::EmptyCart`] if there is nothing in the cart.
    pub fn create_order(&self, order_date: Date, vat_rate: Percentage) -> Result<Order, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart(self.customer));
        }

        let mut order = Order::new(order_date, self.customer, self.currency())
            .with_policy(self.policy.with_vat_rate(vat_rate));

        for line in &self.items {
            for _ in 0..line.quantity {
                order.push_unit(OrderUnit::new(line.ebook, line.unit_price))?;
            }
        }

        info!(
            %order_date,
            lines = self.items.len(),
            units = order.unit_count(),
            "created order"
        );

        Ok(order)
    }

    /// Text summary of the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer or an e-book can no longer be found.
    pub fn summary(&self, catalog: &Catalog, customers: &CustomerList) -> Result<String, CartError> {
        let customer = customers
            .get(self.customer)
            .ok_or(CartError::UnknownCustomer(self.customer))?;

        if self.is_empty() {
            return Ok(format!("{}'s Shopping Cart is empty.", customer.name()));
        }

        let mut lines = vec![format!(
            "{}'s Shopping Cart:\nTotal Price: {:.2}\nItems:",
            customer.name(),
            display_amount(&self.total_price)
        )];

        for line in &self.items {
            let ebook = catalog
                .get(line.ebook)
                .ok_or(CartError::UnknownEBook(line.ebook))?;

            lines.push(format!(
                "{} - Quantity: {} - Price: {:.2}",
                ebook.title(),
                line.quantity,
                display_amount(&line.line_total()?)
            ));
        }

        Ok(lines.join("\n"))
    }

    fn push_line(&mut self, line: LineItem) -> Result<(), CartError> {
        self.total_price = self.total_price.add(line.line_total()?)?;
        self.items.push(line);

        debug!(ebook = ?line.ebook, quantity = line.quantity, "added cart line");

        Ok(())
    }
}

fn unit_price(catalog: &Catalog, ebook: EBookKey) -> Result<Price, CartError> {
    catalog
        .get(ebook)
        .map(|ebook| *ebook.price())
        .ok_or(CartError::UnknownEBook(ebook))
}
