//! Pricing
//!
//! Money arithmetic shared by carts and orders: line totals, the bulk/loyalty
//! discount chain and VAT. Amounts stay exact decimals; only rendering rounds
//! to two places.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// A monetary amount in one of the ISO currencies.
pub type Price = Money<'static, Currency>;

/// Number of units an order needs before the bulk discount applies.
pub const DEFAULT_BULK_THRESHOLD: usize = 5;

/// Errors that can occur while pricing carts and orders.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A multiplication left the representable range of minor units.
    #[error("price calculation overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Rates used to price an order.
#[derive(Debug, Clone, Copy)]
pub struct PricingPolicy {
    /// VAT rate, charged on the undiscounted subtotal.
    pub vat_rate: Percentage,

    /// Discount for customers holding any loyalty points.
    pub loyalty_discount: Percentage,

    /// Discount for orders of at least `bulk_threshold` units.
    pub bulk_discount: Percentage,

    /// Minimum number of individual units for the bulk discount.
    pub bulk_threshold: usize,
}

impl PricingPolicy {
    /// Returns a copy of this policy with a different VAT rate.
    #[must_use]
    pub fn with_vat_rate(mut self, vat_rate: Percentage) -> Self {
        self.vat_rate = vat_rate;
        self
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            vat_rate: Percentage::from(Decimal::new(8, 2)),
            loyalty_discount: Percentage::from(Decimal::new(10, 2)),
            bulk_discount: Percentage::from(Decimal::new(20, 2)),
            bulk_threshold: DEFAULT_BULK_THRESHOLD,
        }
    }
}

/// The fractional value of a percentage (`8%` is `0.08`).
pub fn rate(percentage: Percentage) -> Decimal {
    // decimal_percentage doesn't expose the inner Decimal
    percentage * Decimal::ONE
}

/// The percent points of a percentage (`0.08` is `8`).
pub fn percent_points(percentage: Percentage) -> Decimal {
    rate(percentage) * Decimal::ONE_HUNDRED
}

/// The amount as printed: two decimal places, ties to even.
pub fn display_amount(price: &Price) -> Decimal {
    price.amount().round_dp(2)
}

/// Total for `quantity` units at `unit_price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total cannot be represented.
pub fn line_total(unit_price: Price, quantity: u32) -> Result<Price, PricingError> {
    scale(unit_price, Decimal::from(quantity))
}

/// Multiply a price by a decimal factor, keeping the exact result.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result cannot be represented.
pub fn scale(price: Price, factor: Decimal) -> Result<Price, PricingError> {
    let amount = price
        .amount()
        .checked_mul(factor)
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_decimal(amount, price.currency()))
}

/// The multiplier left after taking `percentage` off.
fn remaining(percentage: Percentage) -> Result<Decimal, PricingError> {
    Decimal::ONE
        .checked_sub(rate(percentage))
        .ok_or(PricingError::Overflow)
}

/// Apply the bulk discount and then the loyalty discount to `subtotal`.
///
/// Bulk applies when `units` reaches the policy threshold; loyalty applies when
/// the customer holds any points. The two compound rather than add up.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the discounted total cannot be represented.
pub fn discounted_total(
    subtotal: Price,
    units: usize,
    loyalty_points: u64,
    policy: &PricingPolicy,
) -> Result<Price, PricingError> {
    let mut total = subtotal;

    if units >= policy.bulk_threshold {
        total = discount(total, policy.bulk_discount)?;
    }

    if loyalty_points > 0 {
        total = discount(total, policy.loyalty_discount)?;
    }

    Ok(total)
}

/// Take `discount` off `price`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result cannot be represented.
pub fn discount(price: Price, discount: Percentage) -> Result<Price, PricingError> {
    scale(price, remaining(discount)?)
}

/// VAT owed on `subtotal`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the VAT amount cannot be represented.
pub fn vat_on(subtotal: Price, vat_rate: Percentage) -> Result<Price, PricingError> {
    scale(subtotal, rate(vat_rate))
}
