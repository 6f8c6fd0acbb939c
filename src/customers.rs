//! Customers

use std::fmt;

use slotmap::{SlotMap, new_key_type};
use thiserror::Error;
use tracing::{info, warn};

use crate::books::EBook;

new_key_type! {
    /// Customer Key
    pub struct CustomerKey;
}

/// Customer list error variants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerListError {
    /// Customer is not a member of the list.
    #[error("customer not found")]
    NotFound(CustomerKey),
}

/// A customer account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    name: String,
    email: String,
    phone: String,
    loyalty_points: u64,
}

impl Customer {
    /// Create a new customer with no loyalty points.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            loyalty_points: 0,
        }
    }

    /// Name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Set the email.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Phone
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Set the phone number.
    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    /// Loyalty points
    pub fn loyalty_points(&self) -> u64 {
        self.loyalty_points
    }

    /// Check if the customer holds any loyalty points.
    pub fn has_loyalty_points(&self) -> bool {
        self.loyalty_points > 0
    }

    /// Set the loyalty points; negative values clamp to zero.
    pub fn set_loyalty_points(&mut self, points: i64) {
        self.loyalty_points = u64::try_from(points).unwrap_or(0);
    }

    /// Add `delta` points (which may be negative), clamping at zero.
    pub fn update_loyalty_points(&mut self, delta: i64) {
        let current = i64::try_from(self.loyalty_points).unwrap_or(i64::MAX);

        self.set_loyalty_points(current.saturating_add(delta));

        info!(
            customer = %self.name,
            loyalty_points = self.loyalty_points,
            "updated loyalty points"
        );
    }

    /// Announce a newly created account.
    pub fn create_account(&self) {
        info!(customer = %self.name, "created customer account");
    }

    /// Overwrite the supplied, non-empty fields.
    pub fn update_account(&mut self, update: CustomerUpdate) {
        if let Some(name) = non_empty(update.name) {
            self.name = name;
        }

        if let Some(email) = non_empty(update.email) {
            self.email = email;
        }

        if let Some(phone) = non_empty(update.phone) {
            self.phone = phone;
        }

        info!(customer = %self.name, "updated customer account");
    }

    /// Record an order for `ebook`, earning one loyalty point.
    pub fn place_order(&mut self, ebook: &EBook) {
        info!(customer = %self.name, title = %ebook.title(), "placed order");

        self.update_loyalty_points(1);
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Customer Name: {}", self.name)?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Phone: {}", self.phone)?;
        write!(f, "Loyalty Points: {}", self.loyalty_points)
    }
}

/// Account changes; `None` or empty values leave the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    /// New name
    pub name: Option<String>,

    /// New email
    pub email: Option<String>,

    /// New phone number
    pub phone: Option<String>,
}

/// Registered customers, in the order they were added.
#[derive(Debug)]
pub struct CustomerList {
    customers: SlotMap<CustomerKey, Customer>,
    order: Vec<CustomerKey>,
}

impl CustomerList {
    /// Create an empty customer list.
    pub fn new() -> Self {
        Self {
            customers: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add a customer, returning its key.
    pub fn add_customer(&mut self, customer: Customer) -> CustomerKey {
        info!(customer = %customer.name(), "added customer");

        let key = self.customers.insert(customer);
        self.order.push(key);

        key
    }

    /// Update a member's account details.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerListError::NotFound`] if `key` is not a member; nothing is changed.
    pub fn modify_customer(
        &mut self,
        key: CustomerKey,
        update: CustomerUpdate,
    ) -> Result<&Customer, CustomerListError> {
        let Some(customer) = self.customers.get_mut(key) else {
            warn!(?key, "customer not found");
            return Err(CustomerListError::NotFound(key));
        };

        customer.update_account(update);

        Ok(customer)
    }

    /// Remove a member, handing back its record.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerListError::NotFound`] if `key` is not a member.
    pub fn remove_customer(&mut self, key: CustomerKey) -> Result<Customer, CustomerListError> {
        let Some(customer) = self.customers.remove(key) else {
            warn!(?key, "customer not found");
            return Err(CustomerListError::NotFound(key));
        };

        self.order.retain(|member| *member != key);

        info!(customer = %customer.name(), "removed customer");

        Ok(customer)
    }

    /// Get a customer by key.
    pub fn get(&self, key: CustomerKey) -> Option<&Customer> {
        self.customers.get(key)
    }

    /// Get a mutable customer by key.
    pub fn get_mut(&mut self, key: CustomerKey) -> Option<&mut Customer> {
        self.customers.get_mut(key)
    }

    /// Check if `key` is a member.
    pub fn contains(&self, key: CustomerKey) -> bool {
        self.customers.contains_key(key)
    }

    /// All customers with their keys, in the order they were added.
    pub fn all_customers(&self) -> impl Iterator<Item = (CustomerKey, &Customer)> {
        self.order
            .iter()
            .filter_map(|key| self.customers.get(*key).map(|customer| (*key, customer)))
    }

    /// Number of customers.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if there are no customers.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for CustomerList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Customer List is empty.");
        }

        write!(f, "Customer List ({} customers):", self.len())?;

        for (_, customer) in self.all_customers() {
            write!(f, "\n{customer}")?;
        }

        Ok(())
    }
}
