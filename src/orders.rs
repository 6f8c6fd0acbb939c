//! Orders

use std::io;

use decimal_percentage::Percentage;
use jiff::civil::Date;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    books::EBookKey,
    catalog::Catalog,
    customers::{CustomerKey, CustomerList},
    invoice::{Invoice, InvoiceError, InvoiceLine},
    pricing::{self, Price, PricingError, PricingPolicy},
};

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// The e-book is not in the catalog.
    #[error("e-book not found in catalog")]
    UnknownEBook(EBookKey),

    /// The ordering customer is not in the customer list.
    #[error("customer not found")]
    UnknownCustomer(CustomerKey),

    /// Error calculating discounts or VAT.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One purchased copy of an e-book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderUnit {
    ebook: EBookKey,
    price: Price,
}

impl OrderUnit {
    /// Create a unit of `ebook` sold at `price`.
    pub fn new(ebook: EBookKey, price: Price) -> Self {
        Self { ebook, price }
    }

    /// The e-book purchased.
    pub fn ebook(&self) -> EBookKey {
        self.ebook
    }

    /// The price paid for this copy, before discounts.
    pub fn price(&self) -> Price {
        self.price
    }
}

/// A customer order.
///
/// `total_price` is the undiscounted subtotal. Discounts and VAT are worked out
/// from it on every query and never stored back.
#[derive(Debug, Clone)]
pub struct Order {
    order_date: Date,
    customer: CustomerKey,
    ebooks: Vec<OrderUnit>,
    total_price: Price,
    policy: PricingPolicy,
}

impl Order {
    /// Create an empty order using the default pricing policy.
    pub fn new(order_date: Date, customer: CustomerKey, currency: &'static Currency) -> Self {
        Self {
            order_date,
            customer,
            ebooks: Vec::new(),
            total_price: Money::from_minor(0, currency),
            policy: PricingPolicy::default(),
        }
    }

    /// Price the order with `policy`.
    #[must_use]
    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Order date
    pub fn order_date(&self) -> Date {
        self.order_date
    }

    /// Set the order date.
    pub fn set_order_date(&mut self, order_date: Date) {
        self.order_date = order_date;
    }

    /// The ordering customer.
    pub fn customer(&self) -> CustomerKey {
        self.customer
    }

    /// Set the ordering customer.
    pub fn set_customer(&mut self, customer: CustomerKey) {
        self.customer = customer;
    }

    /// One entry per purchased copy.
    pub fn ebooks(&self) -> &[OrderUnit] {
        &self.ebooks
    }

    /// Number of purchased copies.
    pub fn unit_count(&self) -> usize {
        self.ebooks.len()
    }

    /// Subtotal before discounts and VAT.
    pub fn total_price(&self) -> Price {
        self.total_price
    }

    /// Pricing policy for the order.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// VAT rate
    pub fn vat_rate(&self) -> Percentage {
        self.policy.vat_rate
    }

    /// Set the VAT rate.
    pub fn set_vat_rate(&mut self, vat_rate: Percentage) {
        self.policy.vat_rate = vat_rate;
    }

    /// Loyalty discount rate
    pub fn loyalty_discount(&self) -> Percentage {
        self.policy.loyalty_discount
    }

    /// Set the loyalty discount rate.
    pub fn set_loyalty_discount(&mut self, loyalty_discount: Percentage) {
        self.policy.loyalty_discount = loyalty_discount;
    }

    /// Bulk discount rate
    pub fn bulk_discount(&self) -> Percentage {
        self.policy.bulk_discount
    }

    /// Set the bulk discount rate.
    pub fn set_bulk_discount(&mut self, bulk_discount: Percentage) {
        self.policy.bulk_discount = bulk_discount;
    }

    /// Add one copy of `ebook` at its current catalog price.
    ///
    /// # Errors
    ///
    /// Returns an error if the e-book is not in `catalog` or its currency differs
    /// from the order's.
    pub fn add_ebook(&mut self, catalog: &Catalog, ebook: EBookKey) -> Result<(), OrderError> {
        let price = *catalog
            .get(ebook)
            .ok_or(OrderError::UnknownEBook(ebook))?
            .price();

        self.push_unit(OrderUnit::new(ebook, price))
    }

    pub(crate) fn push_unit(&mut self, unit: OrderUnit) -> Result<(), OrderError> {
        self.total_price = self.total_price.add(unit.price)?;
        self.ebooks.push(unit);

        Ok(())
    }

    /// Subtotal after the bulk and loyalty discounts, before VAT.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is unknown or the discounted amount overflows.
    pub fn apply_discounts(&self, customers: &CustomerList) -> Result<Price, OrderError> {
        let customer = customers
            .get(self.customer)
            .ok_or(OrderError::UnknownCustomer(self.customer))?;

        Ok(pricing::discounted_total(
            self.total_price,
            self.ebooks.len(),
            customer.loyalty_points(),
            &self.policy,
        )?)
    }

    /// VAT on the undiscounted subtotal.
    ///
    /// # Errors
    ///
    /// Returns an error if the VAT amount overflows.
    pub fn vat_amount(&self) -> Result<Price, OrderError> {
        Ok(pricing::vat_on(self.total_price, self.policy.vat_rate)?)
    }

    /// Discounted subtotal plus VAT.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer is unknown or a calculation overflows.
    pub fn grand_total(&self, customers: &CustomerList) -> Result<Price, OrderError> {
        Ok(self.apply_discounts(customers)?.add(self.vat_amount()?)?)
    }

    /// Price the order and collect everything an invoice shows.
    ///
    /// # Errors
    ///
    /// Returns an error if the customer or an e-book is unknown, or pricing fails.
    pub fn invoice(
        &self,
        catalog: &Catalog,
        customers: &CustomerList,
    ) -> Result<Invoice, OrderError> {
        let customer = customers
            .get(self.customer)
            .ok_or(OrderError::UnknownCustomer(self.customer))?;

        let lines = self
            .ebooks
            .iter()
            .map(|unit| {
                catalog
                    .get(unit.ebook)
                    .map(|ebook| InvoiceLine::new(ebook.title(), unit.price))
                    .ok_or(OrderError::UnknownEBook(unit.ebook))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let discounted = self.apply_discounts(customers)?;
        let vat_amount = self.vat_amount()?;

        Ok(Invoice {
            order_date: self.order_date,
            customer_name: customer.name().to_string(),
            lines,
            subtotal: self.total_price,
            vat_rate: self.policy.vat_rate,
            vat_amount,
            discounted,
            grand_total: discounted.add(vat_amount)?,
        })
    }

    /// Write the invoice to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if the invoice cannot be priced or written.
    pub fn generate_invoice(
        &self,
        out: impl io::Write,
        catalog: &Catalog,
        customers: &CustomerList,
    ) -> Result<(), InvoiceError> {
        self.invoice(catalog, customers)?.write_to(out)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;
    use crate::{
        books::{EBook, FileFormat},
        customers::Customer,
    };

    struct Setup {
        catalog: Catalog,
        customers: CustomerList,
        customer: CustomerKey,
        ebooks: Vec<EBookKey>,
    }

    fn setup(prices: &[i64], loyalty_points: i64) -> Setup {
        let mut catalog = Catalog::new();
        let ebooks = prices
            .iter()
            .enumerate()
            .map(|(idx, minor)| {
                catalog.add_item(EBook::new(
                    format!("E-Book {}", idx + 1),
                    "Author",
                    date(2022, 1, 1),
                    "Fiction",
                    Money::from_minor(*minor, USD),
                    FileFormat::Epub,
                ))
            })
            .collect();

        let mut john = Customer::new("John Doe", "john.doe@example.com", "+1234567890");
        john.set_loyalty_points(loyalty_points);

        let mut customers = CustomerList::new();
        let customer = customers.add_customer(john);

        Setup {
            catalog,
            customers,
            customer,
            ebooks,
        }
    }

    fn order(s: &Setup) -> Result<Order, OrderError> {
        let mut order = Order::new(date(2024, 1, 1), s.customer, USD);

        for ebook in &s.ebooks {
            order.add_ebook(&s.catalog, *ebook)?;
        }

        Ok(order)
    }

    #[test]
    fn add_ebook_accumulates_subtotal() -> TestResult {
        let s = setup(&[1_000, 2_000], 0);
        let order = order(&s)?;

        assert_eq!(order.unit_count(), 2);
        assert_eq!(order.total_price(), Money::from_minor(3_000, USD));

        Ok(())
    }

    #[test]
    fn bulk_and_loyalty_discounts_compound() -> TestResult {
        let s = setup(&[1_000, 2_000, 1_500, 2_500, 3_000], 100);
        let order = order(&s)?;

        assert_eq!(order.apply_discounts(&s.customers)?, Money::from_minor(7_200, USD));
        assert_eq!(order.vat_amount()?, Money::from_minor(800, USD));
        assert_eq!(order.grand_total(&s.customers)?, Money::from_minor(8_000, USD));

        // Pricing never touches the stored subtotal.
        assert_eq!(order.total_price(), Money::from_minor(10_000, USD));

        Ok(())
    }

    #[test]
    fn four_units_get_no_bulk_discount() -> TestResult {
        let s = setup(&[1_000, 2_000, 1_500, 2_500], 0);
        let order = order(&s)?;

        assert_eq!(order.apply_discounts(&s.customers)?, Money::from_minor(7_000, USD));

        Ok(())
    }

    #[test]
    fn bulk_counts_units_not_titles() -> TestResult {
        let s = setup(&[1_000], 0);
        let mut order = Order::new(date(2024, 1, 1), s.customer, USD);
        let ebook = s.ebooks.first().copied().ok_or("no e-book")?;

        for _ in 0..5 {
            order.add_ebook(&s.catalog, ebook)?;
        }

        assert_eq!(order.apply_discounts(&s.customers)?, Money::from_minor(4_000, USD));

        Ok(())
    }

    #[test]
    fn discounts_follow_current_loyalty_points() -> TestResult {
        let mut s = setup(&[1_000], 0);
        let order = order(&s)?;

        assert_eq!(order.apply_discounts(&s.customers)?, Money::from_minor(1_000, USD));

        s.customers
            .get_mut(s.customer)
            .ok_or("missing customer")?
            .update_loyalty_points(1);

        assert_eq!(order.apply_discounts(&s.customers)?, Money::from_minor(900, USD));

        Ok(())
    }

    #[test]
    fn vat_is_charged_on_undiscounted_subtotal() -> TestResult {
        let s = setup(&[2_000, 2_000, 2_000, 2_000, 2_000], 5);
        let mut order = order(&s)?;
        order.set_vat_rate(Percentage::from(Decimal::new(20, 2)));

        let discounted = order.apply_discounts(&s.customers)?;
        let vat = order.vat_amount()?;

        assert_eq!(discounted, Money::from_minor(7_200, USD));
        assert_eq!(vat, Money::from_minor(2_000, USD));
        assert_eq!(order.grand_total(&s.customers)?, Money::from_minor(9_200, USD));

        Ok(())
    }

    #[test]
    fn custom_discount_rates() -> TestResult {
        let s = setup(&[1_000, 1_000, 1_000, 1_000, 1_000], 1);
        let mut order = order(&s)?;
        order.set_bulk_discount(Percentage::from(Decimal::new(50, 2)));
        order.set_loyalty_discount(Percentage::from(Decimal::new(0, 0)));

        assert_eq!(order.apply_discounts(&s.customers)?, Money::from_minor(2_500, USD));

        Ok(())
    }

    #[test]
    fn unknown_customer_errors() -> TestResult {
        let mut s = setup(&[1_000], 0);
        let order = order(&s)?;
        s.customers.remove_customer(s.customer)?;

        assert_eq!(
            order.apply_discounts(&s.customers),
            Err(OrderError::UnknownCustomer(s.customer))
        );

        Ok(())
    }

    #[test]
    fn add_unknown_ebook_errors() -> TestResult {
        let mut s = setup(&[1_000], 0);
        let ebook = s.ebooks.first().copied().ok_or("no e-book")?;
        s.catalog.remove_item("E-Book 1");

        let mut order = Order::new(date(2024, 1, 1), s.customer, USD);

        assert_eq!(
            order.add_ebook(&s.catalog, ebook),
            Err(OrderError::UnknownEBook(ebook))
        );
        assert_eq!(order.total_price(), Money::from_minor(0, USD));

        Ok(())
    }
}
