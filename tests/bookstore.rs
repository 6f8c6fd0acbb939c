//! Integration tests for catalog, customer and cart bookkeeping against the
//! `bookstore` fixture set.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use ebookstore::prelude::*;

fn bookstore() -> Result<Fixture, FixtureError> {
    Fixture::from_set("bookstore")
}

#[test]
fn fixture_set_loads_in_file_order() -> TestResult {
    let fixture = bookstore()?;

    let titles: Vec<&str> = fixture.catalog().list_items().map(|ebook| ebook.title()).collect();

    assert_eq!(titles, ["Learn Python", "E-Book One", "E-Book Two"]);
    assert_eq!(fixture.customers().len(), 2);
    assert_eq!(fixture.carts().len(), 2);

    Ok(())
}

#[test]
fn catalog_lookups_ignore_case_but_removal_does_not() -> TestResult {
    let mut fixture = bookstore()?;
    let catalog = fixture.catalog_mut();

    let modified = catalog.modify_item(
        "learn python",
        EBookUpdate {
            price: Some(Money::from_minor(2_499, USD)),
            genre: Some("Computer Science".to_string()),
            ..EBookUpdate::default()
        },
    );

    assert!(modified.is_some());

    let ebook = catalog.find_by_title("LEARN PYTHON").ok_or("not found")?;

    assert_eq!(ebook.price(), &Money::from_minor(2_499, USD));
    assert_eq!(ebook.genre(), "Computer Science");

    assert_eq!(catalog.remove_item("learn python"), 0);
    assert_eq!(catalog.remove_item("Learn Python"), 1);
    assert!(catalog.find_by_title("Learn Python").is_none());
    assert_eq!(catalog.len(), 2);

    Ok(())
}

#[test]
fn cart_bookkeeping_tracks_total() -> TestResult {
    let fixture = bookstore()?;
    let catalog = fixture.catalog();
    let one = fixture.ebook_key("ebook-one")?;
    let two = fixture.ebook_key("ebook-two")?;

    let mut cart = ShoppingCart::new(fixture.customer_key("john")?, USD);

    cart.add_item(catalog, one, 1)?;
    assert_eq!(cart.total_price(), Money::from_minor(999, USD));

    cart.remove_item(one)?;
    assert!(cart.is_empty());
    assert_eq!(cart.total_price(), Money::from_minor(0, USD));

    cart.add_item(catalog, one, 2)?;
    cart.add_item(catalog, two, 1)?;
    assert_eq!(cart.total_price(), Money::from_minor(3_497, USD));

    cart.update_quantity(catalog, one, 3)?;
    assert_eq!(cart.total_price(), Money::from_minor(4_496, USD));

    let order: Vec<EBookKey> = cart.items().iter().map(LineItem::ebook).collect();
    assert_eq!(order, [two, one]);

    Ok(())
}

#[test]
fn cart_summary_lists_lines() -> TestResult {
    let fixture = bookstore()?;
    let cart = fixture.carts().first().ok_or("missing cart")?;

    assert_eq!(
        cart.summary(fixture.catalog(), fixture.customers())?,
        "John Doe's Shopping Cart:\n\
         Total Price: 34.97\n\
         Items:\n\
         E-Book One - Quantity: 2 - Price: 19.98\n\
         E-Book Two - Quantity: 1 - Price: 14.99"
    );

    Ok(())
}

#[test]
fn loyalty_discount_needs_points() -> TestResult {
    let fixture = bookstore()?;
    let mut carts = fixture.carts().to_vec();

    let [john, jane] = carts.as_mut_slice() else {
        return Err("expected two carts".into());
    };

    assert!(!john.apply_loyalty_discount(fixture.customers())?);
    assert_eq!(john.total_price(), Money::from_minor(3_497, USD));

    // 29.99 less 10%
    assert!(jane.apply_loyalty_discount(fixture.customers())?);
    assert_eq!(jane.total_price().amount(), &Decimal::new(26_991, 3));

    Ok(())
}

#[test]
fn customer_accounts_can_be_updated_and_removed() -> TestResult {
    let mut fixture = bookstore()?;
    let john = fixture.customer_key("john")?;
    let jane = fixture.customer_key("jane")?;
    let customers = fixture.customers_mut();

    let updated = customers.modify_customer(
        john,
        CustomerUpdate {
            email: Some("john.new@example.com".to_string()),
            phone: Some("+0987654321".to_string()),
            ..CustomerUpdate::default()
        },
    )?;

    assert_eq!(updated.email(), "john.new@example.com");
    assert_eq!(updated.phone(), "+0987654321");

    let removed = customers.remove_customer(jane)?;

    assert_eq!(removed.name(), "Jane Roe");
    assert_eq!(
        customers.modify_customer(jane, CustomerUpdate::default()).map(|_| ()),
        Err(CustomerListError::NotFound(jane))
    );
    assert_eq!(customers.len(), 1);

    Ok(())
}

#[test]
fn removed_ebook_breaks_cart_summary() -> TestResult {
    let mut fixture = bookstore()?;
    fixture.catalog_mut().remove_item("E-Book Two");

    let cart = fixture.carts().first().ok_or("missing cart")?;
    let result = cart.summary(fixture.catalog(), fixture.customers());

    assert!(matches!(result, Err(CartError::UnknownEBook(_))));

    Ok(())
}
