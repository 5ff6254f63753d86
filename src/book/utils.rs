use crate::book::BookRecord;
use itertools::Itertools;

/// Provide utility methods for collections of [`BookRecord`].
pub trait BookRecordsUtils {
    fn ids(&self) -> Vec<&str>;
    fn duplicate_ids(&self) -> Vec<&str>;
    fn find_by_id(&self, id: &str) -> Option<&BookRecord>;
    fn find_by_id_mut(&mut self, id: &str) -> Option<&mut BookRecord>;
    fn active(&self) -> Vec<BookRecord>;
    fn next_id(&self) -> String;
}

impl BookRecordsUtils for [BookRecord] {
    /// Returns the id of each record, in collection order.
    fn ids(&self) -> Vec<&str> {
        self.iter().map(|r| r.id.as_str()).collect()
    }
    /// Returns every id that appears more than once.
    ///
    /// # Example
    /// ```rust
    /// # use bookshelf::book::{BookData, BookRecord, Condition, utils::*};
    /// # use chrono::NaiveDate;
    /// # let data = BookData {
    /// #     title: "T".into(), author: "A".into(), isbn: "0".into(), published_year: 2000,
    /// #     genre: "G".into(), description: "D".into(), condition: Condition::Good,
    /// # };
    /// # let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let records = [
    ///     BookRecord::new("1", data.clone(), today),
    ///     BookRecord::new("2", data.clone(), today),
    ///     BookRecord::new("2", data, today),
    /// ];
    /// assert_eq!(records.duplicate_ids(), vec!["2"]);
    /// ```
    fn duplicate_ids(&self) -> Vec<&str> {
        return self.ids().into_iter().duplicates().collect();
    }
    /// Returns a reference to the first record with the given id, if it exists.
    fn find_by_id(&self, id: &str) -> Option<&BookRecord> {
        self.iter().find(|r| r.id == id)
    }
    /// Returns a mutable reference to the first record with the given id, if it exists.
    fn find_by_id_mut(&mut self, id: &str) -> Option<&mut BookRecord> {
        self.iter_mut().find(|r| r.id == id)
    }
    /// Returns the active records, preserving collection order.
    fn active(&self) -> Vec<BookRecord> {
        self.iter().filter(|r| r.is_active).cloned().collect()
    }
    /// Returns the id the next added record receives: the record count plus one.
    ///
    /// This is not collision-safe when records were removed from the store by hand.
    ///
    /// # Example
    /// ```rust
    /// # use bookshelf::book::{BookRecord, utils::*};
    /// let empty: [BookRecord; 0] = [];
    /// assert_eq!(empty.next_id(), "1");
    /// ```
    fn next_id(&self) -> String {
        (self.len() + 1).to_string()
    }
}
