//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for carts in YAML
#[derive(Debug, Deserialize)]
pub struct CartsFixture {
    /// Carts in file order
    pub carts: Vec<CartFixture>,
}

/// Cart Fixture
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Customer key
    pub customer: String,

    /// Lines, in the order they are added
    #[serde(default)]
    pub items: Vec<CartItemFixture>,
}

/// Cart line fixture
#[derive(Debug, Deserialize)]
pub struct CartItemFixture {
    /// E-book key
    pub ebook: String,

    /// Number of copies
    #[serde(default = "one")]
    pub quantity: u32,
}

fn one() -> u32 {
    1
}
