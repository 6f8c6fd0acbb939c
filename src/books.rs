//! Books

use std::{
    fmt,
    ops::{Deref, DerefMut},
    str::FromStr,
};

use jiff::civil::Date;
use serde::Deserialize;
use slotmap::new_key_type;
use thiserror::Error;
use tracing::info;

use crate::pricing::{Price, display_amount};

new_key_type! {
    /// E-book Key
    pub struct EBookKey;
}

/// Error returned when parsing an unknown file format.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown e-book file format: {0}")]
pub struct UnknownFileFormat(pub String);

/// File format an e-book is delivered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileFormat {
    /// Portable Document Format
    Pdf,

    /// EPUB
    Epub,

    /// Mobipocket
    Mobi,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Pdf => "PDF",
            FileFormat::Epub => "EPUB",
            FileFormat::Mobi => "MOBI",
        })
    }
}

impl FromStr for FileFormat {
    type Err = UnknownFileFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PDF" => Ok(FileFormat::Pdf),
            "EPUB" => Ok(FileFormat::Epub),
            "MOBI" => Ok(FileFormat::Mobi),
            _ => Err(UnknownFileFormat(s.to_string())),
        }
    }
}

/// Book
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    title: String,
    author: String,
    publication_date: Date,
    genre: String,
    price: Price,
}

impl Book {
    /// Create a new book.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_date: Date,
        genre: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publication_date,
            genre: genre.into(),
            price,
        }
    }

    /// Title, also used as the catalog lookup key.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Set the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Author
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Set the author.
    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// Publication date
    pub fn publication_date(&self) -> Date {
        self.publication_date
    }

    /// Set the publication date.
    pub fn set_publication_date(&mut self, publication_date: Date) {
        self.publication_date = publication_date;
    }

    /// Genre
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Set the genre.
    pub fn set_genre(&mut self, genre: impl Into<String>) {
        self.genre = genre.into();
    }

    /// Price
    pub fn price(&self) -> &Price {
        &self.price
    }

    /// Set the price.
    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}, {})",
            self.title,
            self.author,
            self.genre,
            self.publication_date.year()
        )
    }
}

/// A book sold as a downloadable file.
///
/// Dereferences to the underlying [`Book`] for the shared attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct EBook {
    book: Book,
    file_format: FileFormat,
}

impl EBook {
    /// Create a new e-book.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publication_date: Date,
        genre: impl Into<String>,
        price: Price,
        file_format: FileFormat,
    ) -> Self {
        Self {
            book: Book::new(title, author, publication_date, genre, price),
            file_format,
        }
    }

    /// File format
    pub fn file_format(&self) -> FileFormat {
        self.file_format
    }

    /// Set the file format.
    pub fn set_file_format(&mut self, file_format: FileFormat) {
        self.file_format = file_format;
    }

    /// Deliver the e-book, returning the delivery notice.
    pub fn deliver(&self) -> String {
        info!(title = %self.title(), format = %self.file_format, "delivering e-book");

        format!(
            "Delivering {} in {} format.",
            self.title(),
            self.file_format
        )
    }

    /// Apply the fields present in `update`; title is left untouched.
    pub fn apply(&mut self, update: EBookUpdate) {
        if let Some(author) = update.author {
            self.set_author(author);
        }

        if let Some(publication_date) = update.publication_date {
            self.set_publication_date(publication_date);
        }

        if let Some(genre) = update.genre {
            self.set_genre(genre);
        }

        if let Some(price) = update.price {
            self.set_price(price);
        }

        if let Some(file_format) = update.file_format {
            self.set_file_format(file_format);
        }
    }
}

impl Deref for EBook {
    type Target = Book;

    fn deref(&self) -> &Self::Target {
        &self.book
    }
}

impl DerefMut for EBook {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.book
    }
}

impl fmt::Display for EBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "E-Book Title: {}", self.title())?;
        writeln!(f, "Author: {}", self.author())?;
        writeln!(f, "Publication Date: {}", self.publication_date())?;
        writeln!(f, "Genre: {}", self.genre())?;
        writeln!(
            f,
            "Price: {}{:.2}",
            self.price().currency().symbol,
            display_amount(self.price())
        )?;
        writeln!(f, "File Format: {}", self.file_format)
    }
}

/// Partial update for an e-book; `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EBookUpdate {
    /// New author
    pub author: Option<String>,

    /// New publication date
    pub publication_date: Option<Date>,

    /// New genre
    pub genre: Option<String>,

    /// New price
    pub price: Option<Price>,

    /// New file format
    pub file_format: Option<FileFormat>,
}
