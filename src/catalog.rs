//! Catalog

use std::{fmt, io};

use slotmap::SlotMap;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    books::{EBook, EBookKey, EBookUpdate},
    pricing::display_amount,
};

/// The e-books on offer, in the order they were added.
///
/// The catalog owns its e-books; carts and orders refer to them by [`EBookKey`].
#[derive(Debug)]
pub struct Catalog {
    items: SlotMap<EBookKey, EBook>,
    order: Vec<EBookKey>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add an e-book. Titles are not checked for duplicates.
    pub fn add_item(&mut self, ebook: EBook) -> EBookKey {
        let key = self.items.insert(ebook);
        self.order.push(key);

        key
    }

    /// Get an e-book by key.
    pub fn get(&self, key: EBookKey) -> Option<&EBook> {
        self.items.get(key)
    }

    /// Get a mutable e-book by key.
    pub fn get_mut(&mut self, key: EBookKey) -> Option<&mut EBook> {
        self.items.get_mut(key)
    }

    /// Key of the first e-book whose title matches, ignoring case.
    pub fn key_by_title(&self, title: &str) -> Option<EBookKey> {
        let wanted = title.to_lowercase();

        self.iter()
            .find(|(_, ebook)| ebook.title().to_lowercase() == wanted)
            .map(|(key, _)| key)
    }

    /// First e-book whose title matches, ignoring case.
    pub fn find_by_title(&self, title: &str) -> Option<&EBook> {
        self.key_by_title(title).and_then(|key| self.get(key))
    }

    /// Update the first e-book whose title matches, ignoring case.
    ///
    /// Returns the key of the modified e-book, or `None` if no title matched.
    pub fn modify_item(&mut self, title: &str, update: EBookUpdate) -> Option<EBookKey> {
        let key = self.key_by_title(title)?;

        self.items.get_mut(key)?.apply(update);

        Some(key)
    }

    /// Remove every e-book whose title is exactly `title`.
    ///
    /// Unlike lookups, this comparison is case-sensitive. Returns the number removed.
    pub fn remove_item(&mut self, title: &str) -> usize {
        let items = &mut self.items;
        let before = self.order.len();

        self.order.retain(|key| {
            let matches = items.get(*key).is_some_and(|ebook| ebook.title() == title);

            if matches {
                items.remove(*key);
            }

            !matches
        });

        before - self.order.len()
    }

    /// All e-books, in catalog order.
    pub fn list_items(&self) -> impl Iterator<Item = &EBook> {
        self.iter().map(|(_, ebook)| ebook)
    }

    /// All e-books with their keys, in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (EBookKey, &EBook)> {
        self.order
            .iter()
            .filter_map(|key| self.items.get(*key).map(|ebook| (*key, ebook)))
    }

    /// Number of e-books in the catalog.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Write the catalog as a table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write_table(&self, mut out: impl io::Write) -> io::Result<()> {
        let mut builder = Builder::default();

        builder.push_record(["", "Title", "Author", "Published", "Genre", "Format", "Price"]);

        for (idx, ebook) in self.list_items().enumerate() {
            builder.push_record([
                format!("#{:<3}", idx + 1),
                ebook.title().to_string(),
                ebook.author().to_string(),
                ebook.publication_date().to_string(),
                ebook.genre().to_string(),
                ebook.file_format().to_string(),
                format!("{:.2}", display_amount(ebook.price())),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Columns::new(6..7), Alignment::right());

        writeln!(out, "{table}")
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("The catalog is empty.");
        }

        writeln!(f, "Catalog of E-Books:")?;
        write!(f, "Total e-books: {}", self.len())?;

        for ebook in self.list_items() {
            write!(f, "\n{ebook}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use super::*;
    use crate::books::FileFormat;

    fn ebook(title: &str, minor: i64) -> EBook {
        EBook::new(
            title,
            "Alice Smith",
            date(2022, 1, 1),
            "Programming",
            Money::from_minor(minor, USD),
            FileFormat::Pdf,
        )
    }

    #[test]
    fn add_item_allows_duplicate_titles() {
        let mut catalog = Catalog::new();

        catalog.add_item(ebook("Learn Python", 2_999));
        catalog.add_item(ebook("Learn Python", 1_999));

        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn find_by_title_ignores_case() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("Learn Python", 2_999));

        let found = catalog.find_by_title("learn PYTHON").ok_or("not found")?;

        assert_eq!(found.title(), "Learn Python");
        assert!(catalog.find_by_title("Learn Rust").is_none());

        Ok(())
    }

    #[test]
    fn find_by_title_returns_first_match() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("Learn Python", 2_999));
        catalog.add_item(ebook("LEARN PYTHON", 1_999));

        let found = catalog.find_by_title("learn python").ok_or("not found")?;

        assert_eq!(found.price(), &Money::from_minor(2_999, USD));

        Ok(())
    }

    #[test]
    fn modify_item_ignores_case() -> TestResult {
        let mut catalog = Catalog::new();
        let key = catalog.add_item(ebook("Learn Python", 2_999));

        let modified = catalog.modify_item(
            "LEARN python",
            EBookUpdate {
                price: Some(Money::from_minor(2_499, USD)),
                ..EBookUpdate::default()
            },
        );

        assert_eq!(modified, Some(key));
        assert_eq!(
            catalog.get(key).ok_or("missing")?.price(),
            &Money::from_minor(2_499, USD)
        );

        Ok(())
    }

    #[test]
    fn modify_item_missing_title_is_noop() {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("Learn Python", 2_999));

        let modified = catalog.modify_item(
            "Learn Rust",
            EBookUpdate {
                genre: Some("Systems".to_string()),
                ..EBookUpdate::default()
            },
        );

        assert_eq!(modified, None);
        assert!(catalog.list_items().all(|ebook| ebook.genre() == "Programming"));
    }

    #[test]
    fn remove_item_is_case_sensitive() {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("Learn Python", 2_999));

        assert_eq!(catalog.remove_item("learn python"), 0);
        assert_eq!(catalog.len(), 1);

        assert_eq!(catalog.remove_item("Learn Python"), 1);
        assert!(catalog.is_empty());
    }

    #[test]
    fn remove_item_removes_every_exact_match() {
        let mut catalog = Catalog::new();
        let rust = catalog.add_item(ebook("Learn Rust", 3_999));
        catalog.add_item(ebook("Learn Python", 2_999));
        catalog.add_item(ebook("Learn Python", 1_999));

        assert_eq!(catalog.remove_item("Learn Python"), 2);
        assert_eq!(catalog.iter().map(|(key, _)| key).collect::<Vec<_>>(), [rust]);
    }

    #[test]
    fn list_items_keeps_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("B", 100));
        catalog.add_item(ebook("A", 100));
        catalog.add_item(ebook("C", 100));
        catalog.remove_item("A");
        catalog.add_item(ebook("D", 100));

        let titles: Vec<&str> = catalog.list_items().map(|ebook| ebook.title()).collect();

        assert_eq!(titles, ["B", "C", "D"]);
    }

    #[test]
    fn display_empty_catalog() {
        assert_eq!(Catalog::new().to_string(), "The catalog is empty.");
    }

    #[test]
    fn display_lists_count_and_items() {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("Learn Python", 2_999));

        let rendered = catalog.to_string();

        assert!(rendered.starts_with("Catalog of E-Books:\nTotal e-books: 1\n"));
        assert!(rendered.contains("E-Book Title: Learn Python"));
    }

    #[test]
    fn write_table_renders_rows() -> TestResult {
        let mut catalog = Catalog::new();
        catalog.add_item(ebook("Learn Python", 2_999));

        let mut out = Vec::new();
        catalog.write_table(&mut out)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Learn Python"));
        assert!(rendered.contains("29.99"));
        assert!(rendered.contains("2022-01-01"));

        Ok(())
    }
}
