mod events;
pub use events::*;

use crate::{
    Error, Result,
    book::{BookData, BookRecord, CatalogDocument, Condition, utils::BookRecordsUtils},
    config::CatalogOptions,
    storage::Storage,
};
use chrono::NaiveDate;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::{fmt, path::PathBuf, sync::Arc};
use tracing::{debug, info, warn};

pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate { chrono::Local::now().date_naive() }

/// Book records kept as a single collection in a [`Storage`].
///
/// Every operation reads the whole collection, transforms it in memory and, for
/// mutations, writes the whole collection back. Nothing is cached between calls.
pub struct Catalog<S: Storage> {
    storage: S,
    collection_path: PathBuf,
    options: CatalogOptions,
    clock: Clock,
    mutation_lock: Mutex<()>,
    hooks: RwLock<Vec<ChangeHook>>,
}

impl<S: Storage> fmt::Debug for Catalog<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("storage", &self.storage)
            .field("collection_path", &self.collection_path)
            .field("options", &self.options)
            .field("hooks", &self.hooks.read().len())
            .finish()
    }
}

impl<S: Storage> Catalog<S> {
    pub fn new(storage: S) -> Self { Self::with_options(storage, CatalogOptions::default()) }

    pub fn with_options(storage: S, options: CatalogOptions) -> Self {
        let collection_path = storage.file_path(&options.collection_name);

        Self {
            storage,
            collection_path,
            options,
            clock: local_today,
            mutation_lock: Mutex::new(()),
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Replaces the source of "today" used for added and checkout dates
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &S { &self.storage }

    pub fn collection_path(&self) -> &PathBuf { &self.collection_path }

    /// Registers a hook run after every persisted mutation
    pub fn subscribe(&self, hook: impl Fn(&CatalogEvent) + Send + Sync + 'static) {
        self.hooks.write().push(Arc::new(hook));
    }

    /// Runs hooks on a snapshot of the list, so hooks may mutate or subscribe
    fn notify(&self, event: CatalogEvent) {
        debug!("Catalog change: {event}");

        let hooks = self.hooks.read().clone();
        for hook in hooks {
            hook(&event);
        }
    }

    fn lock_mutations(&self) -> Option<MutexGuard<'_, ()>> {
        self.options
            .serialize_mutations
            .then(|| self.mutation_lock.lock())
    }

    // -- Collection

    /// Reads the whole collection.
    ///
    /// Never fails: a missing, unreadable or unparsable store reads as an empty collection.
    pub fn load_all(&self) -> Vec<BookRecord> {
        let path = &self.collection_path;

        let books = match self.storage.try_read_storage::<CatalogDocument>(path) {
            Ok(document) => document.books,
            Err(Error::StoreNotFound { file_path }) => {
                debug!(
                    "No collection at [{}] in {}, treating as empty.",
                    file_path.display(),
                    S::NAME
                );
                return Vec::new();
            }
            Err(e) => {
                warn!("Failed to load collection from {}, treating as empty: {e}", S::NAME);
                return Vec::new();
            }
        };

        let duplicates = books.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(
                "Collection at [{}] holds duplicate id(s): [{duplicates:?}].",
                path.display()
            );
        }

        return books;
    }

    /// Writes the whole collection, replacing what the store held
    ///
    /// # Errors
    /// - I/O
    /// - Serialization failure
    pub fn save_all(&self, books: impl Into<Vec<BookRecord>>) -> Result<()> {
        let document = CatalogDocument { books: books.into() };

        self.storage
            .try_write_storage(&document, &self.collection_path)?;

        debug!(
            "Saved [{}] record(s) to [{}].",
            document.books.len(),
            self.collection_path.display()
        );
        return Ok(());
    }

    // -- Queries

    /// Every record, inactive ones included
    pub fn get_all(&self) -> Vec<BookRecord> { self.load_all() }

    /// Records still in circulation, in collection order
    pub fn get_active(&self) -> Vec<BookRecord> { self.load_all().active() }

    /// The first record with `id`, active or not
    pub fn get_by_id(&self, id: &str) -> Option<BookRecord> {
        self.load_all().find_by_id(id).cloned()
    }

    // -- Mutations

    /// Appends a new record built from `data` and returns it
    ///
    /// # Errors
    /// - I/O
    pub fn add(&self, data: BookData) -> Result<BookRecord> {
        let record = {
            let _guard = self.lock_mutations();

            let mut books = self.load_all();
            let record = BookRecord::new(books.next_id(), data, (self.clock)());
            books.push(record.clone());

            self.save_all(books)?;
            record
        };

        info!("Added book [{}] \"{}\".", record.id, record.title);
        self.notify(CatalogEvent::Added {
            id: record.id.clone(),
        });
        return Ok(record);
    }

    /// Replaces the editable fields of the record with `id`
    ///
    /// # Errors
    /// - I/O
    pub fn update(&self, id: &str, data: BookData) -> Result<MutationOutcome> {
        let outcome = self.mutate(id, |record| record.apply(data))?;

        if outcome.is_updated() {
            self.notify(CatalogEvent::Updated { id: id.to_string() });
        }
        return Ok(outcome);
    }

    /// Checks the record out, or back in when it is already out
    ///
    /// # Errors
    /// - I/O
    pub fn toggle_checkout(&self, id: &str) -> Result<MutationOutcome> {
        let today = (self.clock)();
        let mut checked_out = false;

        let outcome = self.mutate(id, |record| checked_out = record.toggle_checkout(today))?;

        if outcome.is_updated() {
            self.notify(CatalogEvent::CheckoutToggled {
                id: id.to_string(),
                checked_out,
            });
        }
        return Ok(outcome);
    }

    /// Soft-deletes the record. Its checkout state is left as is.
    ///
    /// # Errors
    /// - I/O
    pub fn set_inactive(&self, id: &str) -> Result<MutationOutcome> {
        let outcome = self.mutate(id, |record| record.is_active = false)?;

        if outcome.is_updated() {
            self.notify(CatalogEvent::Deactivated { id: id.to_string() });
        }
        return Ok(outcome);
    }

    /// # Errors
    /// - I/O
    pub fn update_condition(&self, id: &str, condition: Condition) -> Result<MutationOutcome> {
        let outcome = self.mutate(id, |record| record.condition = condition)?;

        if outcome.is_updated() {
            self.notify(CatalogEvent::ConditionUpdated { id: id.to_string() });
        }
        return Ok(outcome);
    }

    /// Loads, applies `change` to the record with `id`, then saves.
    /// Nothing is written when the id is absent.
    fn mutate(&self, id: &str, change: impl FnOnce(&mut BookRecord)) -> Result<MutationOutcome> {
        let _guard = self.lock_mutations();

        let mut books = self.load_all();
        let Some(record) = books.find_by_id_mut(id) else {
            debug!("No book with id [{id}], nothing to change.");
            return Ok(MutationOutcome::NotFound);
        };

        change(record);
        self.save_all(books)?;

        return Ok(MutationOutcome::Updated);
    }
}
