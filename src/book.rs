pub mod date_format;
pub mod utils;

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Physical condition of a catalogued copy
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    #[display("EXCELLENT")]
    Excellent,
    #[display("GOOD")]
    Good,
    #[display("FAIR")]
    Fair,
    #[display("POOR")]
    Poor,
    #[display("DESTROYED")]
    Destroyed,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::Excellent,
        Condition::Good,
        Condition::Fair,
        Condition::Poor,
        Condition::Destroyed,
    ];
}

/// Returned when a string names no [`Condition`]
#[derive(Clone, Debug, Display, PartialEq, Eq, derive_more::Error)]
#[display("Unknown book condition: [{input}]")]
pub struct UnknownCondition {
    pub input: String,
}

impl FromStr for Condition {
    type Err = UnknownCondition;

    /// Parses the upper-case wire name, ignoring case
    ///
    /// # Example
    /// ```rust
    /// # use bookshelf::book::Condition;
    /// assert_eq!("fair".parse::<Condition>(), Ok(Condition::Fair));
    /// assert!("MINT".parse::<Condition>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return Condition::ALL
            .into_iter()
            .find(|c| c.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCondition {
                input: s.to_string(),
            });
    }
}

/// The caller-editable part of a [`BookRecord`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookData {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub genre: String,
    pub description: String,
    pub condition: Condition,
}

/// A single catalogued book as stored in the collection
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub published_year: i32,
    pub genre: String,
    pub description: String,
    pub condition: Condition,
    pub is_checked_out: bool,
    pub is_active: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "date_format::optional"
    )]
    pub last_checked_out_date: Option<NaiveDate>,
    #[serde(with = "date_format")]
    pub added_date: NaiveDate,
}

impl BookRecord {
    /// Builds a fresh record: available, active, added on `today`
    pub fn new(id: impl Into<String>, data: BookData, today: NaiveDate) -> Self {
        let BookData {
            title,
            author,
            isbn,
            published_year,
            genre,
            description,
            condition,
        } = data;

        Self {
            id: id.into(),
            title,
            author,
            isbn,
            published_year,
            genre,
            description,
            condition,
            is_checked_out: false,
            is_active: true,
            last_checked_out_date: None,
            added_date: today,
        }
    }

    /// Overwrites every editable field. Identity, status flags and dates are kept.
    pub fn apply(&mut self, data: BookData) {
        self.title = data.title;
        self.author = data.author;
        self.isbn = data.isbn;
        self.published_year = data.published_year;
        self.genre = data.genre;
        self.description = data.description;
        self.condition = data.condition;
    }

    /// Flips the checkout flag, stamping `today` when the book goes out and
    /// clearing the stamp when it comes back. Returns the new flag.
    pub fn toggle_checkout(&mut self, today: NaiveDate) -> bool {
        self.is_checked_out = !self.is_checked_out;
        self.last_checked_out_date = self.is_checked_out.then_some(today);

        return self.is_checked_out;
    }

    pub fn data(&self) -> BookData {
        BookData {
            title: self.title.clone(),
            author: self.author.clone(),
            isbn: self.isbn.clone(),
            published_year: self.published_year,
            genre: self.genre.clone(),
            description: self.description.clone(),
            condition: self.condition,
        }
    }
}

/// On-disk shape of the whole collection
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub books: Vec<BookRecord>,
}
