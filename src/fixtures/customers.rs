//! Customer Fixtures

use serde::Deserialize;

use crate::customers::Customer;

/// Wrapper for customers in YAML
#[derive(Debug, Deserialize)]
pub struct CustomersFixture {
    /// Customers in registration order
    pub customers: Vec<CustomerFixture>,
}

/// Customer Fixture
#[derive(Debug, Deserialize)]
pub struct CustomerFixture {
    /// Key carts use to refer to this customer
    pub key: String,

    /// Name
    pub name: String,

    /// Email
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Starting loyalty points
    #[serde(default)]
    pub loyalty_points: u64,
}

impl From<CustomerFixture> for Customer {
    fn from(fixture: CustomerFixture) -> Self {
        let mut customer = Customer::new(fixture.name, fixture.email, fixture.phone);

        customer.set_loyalty_points(i64::try_from(fixture.loyalty_points).unwrap_or(i64::MAX));

        customer
    }
}
