
use bookshelf::{Error as StoreError, prelude::*};
use insta::{assert_debug_snapshot, assert_snapshot};
use std::{error::Error, fs, path::Path, thread};
use tests_books::*;
use tests_utils::*;

fn sorted_file_names(dir: &Path) -> Result<Vec<String>, Box<dyn Error>> {
    let mut file_names: Vec<String> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    file_names.sort();

    Ok(file_names)
}

fn count_failed_parsing_backups(dir: &Path) -> Result<usize, Box<dyn Error>> {
    Ok(sorted_file_names(dir)?
        .iter()
        .filter(|name| name.ends_with("-FAILED_PARSING.bak"))
        .count())
}

#[test]
fn storage_io_json() -> Result<(), Box<dyn Error>> {
    storage_io_tester::<JsonStore>()?;

    Ok(())
}

#[test]
fn storage_io_memory() -> Result<(), Box<dyn Error>> {
    storage_io_tester::<MemoryStore>()?;

    Ok(())
}

fn storage_io_tester<S: Storage>() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) = create_temp_working_dir("storage_io", S::NAME);

    let store = S::new(working_dir)?;
    let path = store.file_path("shelf");

    {
        span_and_info!("Not found");

        let result = store.try_read_storage::<Vec<String>>(&path);
        assert!(matches!(result, Err(StoreError::StoreNotFound { .. })));
    }

    {
        span_and_info!("Operation", "Read Write");

        store.try_write_storage(vec!["Dune", "Emma"], &path)?;
        let mut titles = store.try_read_storage::<Vec<String>>(&path)?;
        assert_eq!(titles, ["Dune", "Emma"]);

        titles.push(String::from("Ulysses"));
        store.try_write_storage(&titles, &path)?;
        assert_eq!(store.try_read_storage::<Vec<String>>(&path)?, titles);
    }

    {
        span_and_info!("Operation", "Backup");

        let backup_path = store.try_backup_storage(&path, "Manual backup")?;
        assert_ne!(backup_path, path);
        assert!(backup_path.to_string_lossy().ends_with("Manual backup.bak"));
        assert_eq!(
            store.try_read_storage::<Vec<String>>(&backup_path)?,
            ["Dune", "Emma", "Ulysses"]
        );
    }

    {
        span_and_info!("Operation", "Copy missing");

        let result = store.try_copy_storage(store.file_path("missing"), store.file_path("copy"));
        assert!(result.is_err());
    }

    Ok(())
}

#[test]
fn json_file_format() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) = create_temp_working_dir("format", JsonStore::NAME);

    let catalog = Catalog::new(JsonStore::new(&working_dir)?).with_clock(new_year);
    catalog.add(dune())?;

    assert_eq!(catalog.collection_path(), &working_dir.join("books.json"));
    assert_snapshot!(fs::read_to_string(catalog.collection_path())?, @r#"
    {
      "books": [
        {
          "id": "1",
          "title": "Dune",
          "author": "Herbert",
          "isbn": "978-0",
          "publishedYear": 1965,
          "genre": "SciFi",
          "description": "...",
          "condition": "GOOD",
          "isCheckedOut": false,
          "isActive": true,
          "addedDate": "2024-01-01"
        }
      ]
    }
    "#);

    catalog.toggle_checkout("1")?;
    let stored = fs::read_to_string(catalog.collection_path())?;
    assert!(stored.contains(r#""lastCheckedOutDate": "2024-01-01""#));

    catalog.toggle_checkout("1")?;
    let stored = fs::read_to_string(catalog.collection_path())?;
    assert!(!stored.contains("lastCheckedOutDate"));

    Ok(())
}

#[test]
fn json_timestamps_are_read_as_dates() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) =
        create_temp_working_dir("timestamps", JsonStore::NAME);

    let store = JsonStore::with_config(
        &working_dir,
        StoreConfig {
            pretty: false,
            ..Default::default()
        },
    )?;
    let catalog = Catalog::new(store);

    fs::write(
        catalog.collection_path(),
        r#"{"books":[{"id":"1","title":"Emma","author":"Austen","isbn":"111-1",
        "publishedYear":1815,"genre":"Novel","description":"Matchmaking.","condition":"FAIR",
        "isCheckedOut":true,"isActive":true,"lastCheckedOutDate":"2024-02-03T23:59:59.000Z",
        "addedDate":"2023-11-30T08:00:00.000Z"}]}"#,
    )?;

    let books = catalog.load_all();
    assert_eq!(books.len(), 1);
    assert_debug_snapshot!(
        (books[0].added_date, books[0].last_checked_out_date, books[0].condition),
        @"
    (
        2023-11-30,
        Some(
            2024-02-03,
        ),
        Fair,
    )
    "
    );

    catalog.save_all(books)?;
    assert_snapshot!(
        fs::read_to_string(catalog.collection_path())?,
        @r#"{"books":[{"id":"1","title":"Emma","author":"Austen","isbn":"111-1","publishedYear":1815,"genre":"Novel","description":"Matchmaking.","condition":"FAIR","isCheckedOut":true,"isActive":true,"lastCheckedOutDate":"2024-02-03","addedDate":"2023-11-30"}]}"#
    );

    Ok(())
}

#[test]
fn json_corrupt_store_reads_empty_and_is_backed_up() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) = create_temp_working_dir("corrupt", JsonStore::NAME);

    let catalog = Catalog::new(JsonStore::new(&working_dir)?).with_clock(new_year);
    fs::write(catalog.collection_path(), "{\"books\": [ {\"id\": ")?;

    assert!(catalog.load_all().is_empty());

    let file_names = sorted_file_names(&working_dir)?;

    insta::with_settings!({filters => vec![(r"\.\d+-", ".[timestamp]-")]}, {
        assert_debug_snapshot!(file_names, @r#"
        [
            "books.json",
            "books.json.[timestamp]-FAILED_PARSING.bak",
        ]
        "#);
    });

    let added = catalog.add(dune())?;
    assert_eq!(added.id, "1");
    assert_eq!(catalog.load_all(), vec![added]);

    Ok(())
}

#[test]
fn json_write_failure_is_returned() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) =
        create_temp_working_dir("unwritable", JsonStore::NAME);

    let catalog = Catalog::new(JsonStore::new(&working_dir)?).with_clock(new_year);
    fs::create_dir_all(catalog.collection_path())?;

    assert!(catalog.load_all().is_empty());

    let events = std::sync::Arc::new(parking_lot::Mutex::new(0_usize));
    {
        let events = std::sync::Arc::clone(&events);
        catalog.subscribe(move |_| *events.lock() += 1);
    }

    let result = catalog.add(dune());
    assert!(matches!(result, Err(StoreError::StoreCorrupt { .. })));
    assert!(catalog.save_all(Vec::<BookRecord>::new()).is_err());
    assert_eq!(*events.lock(), 0);

    Ok(())
}

#[test]
fn json_not_found_mutation_does_not_create_store() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) =
        create_temp_working_dir("untouched", JsonStore::NAME);

    let catalog = Catalog::new(JsonStore::new(&working_dir)?);

    assert_eq!(catalog.set_inactive("1")?, MutationOutcome::NotFound);
    assert_eq!(catalog.update("1", dune())?, MutationOutcome::NotFound);
    assert!(!catalog.collection_path().exists());

    Ok(())
}

#[test]
fn json_atomic_rename_leaves_no_temp_file() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) = create_temp_working_dir("atomic", JsonStore::NAME);

    let config = StoreConfig {
        pretty: false,
        write_mode: WriteMode::AtomicRename,
    };
    let options = CatalogOptions {
        collection_name: String::from("shelf"),
        ..Default::default()
    };
    let catalog = Catalog::with_options(JsonStore::with_config(&working_dir, config)?, options)
        .with_clock(midsummer);

    catalog.add(numbered(1))?;
    catalog.update_condition("1", Condition::Poor)?;

    assert_eq!(catalog.storage().config().write_mode, WriteMode::AtomicRename);
    assert_eq!(sorted_file_names(&working_dir)?, ["shelf.json"]);
    assert_snapshot!(
        fs::read_to_string(working_dir.join("shelf.json"))?,
        @r#"{"books":[{"id":"1","title":"Volume 1","author":"Anonymous","isbn":"000-1","publishedYear":1901,"genre":"Reference","description":"Volume 1 of the series","condition":"POOR","isCheckedOut":false,"isActive":true,"addedDate":"2024-06-21"}]}"#
    );

    Ok(())
}

#[test]
fn memory_corrupt_store_reads_empty() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let store = MemoryStore::new("library")?;
    let catalog = Catalog::new(store.clone()).with_clock(new_year);
    store.insert_raw(catalog.collection_path(), b"[not json".to_vec());

    assert!(catalog.get_all().is_empty());

    catalog.add(dune())?;
    assert_eq!(catalog.get_active().len(), 1);

    Ok(())
}

#[test]
fn duplicate_ids_are_kept_on_load() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let catalog = Catalog::new(MemoryStore::new("library")?).with_clock(new_year);
    let first = catalog.add(dune())?;
    let mut twin = catalog.add(numbered(2))?;
    twin.id = first.id.clone();

    catalog.save_all(vec![first.clone(), twin])?;

    assert_eq!(catalog.get_all().len(), 2);
    assert_eq!(catalog.get_by_id("1"), Some(first));

    Ok(())
}

#[test]
fn json_corrupt_store_is_backed_up_once() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) =
        create_temp_working_dir("corrupt_once", JsonStore::NAME);

    let catalog = Catalog::new(JsonStore::new(&working_dir)?).with_clock(new_year);
    fs::write(catalog.collection_path(), "{ broken")?;

    // Pretend an earlier run already saved this exact content
    fs::write(
        working_dir.join("books.json.1000000000-FAILED_PARSING.bak"),
        "{ broken",
    )?;

    for _ in 0..3 {
        assert!(catalog.get_active().is_empty());
        assert!(catalog.get_all().is_empty());
        assert_eq!(catalog.get_by_id("1"), None);
    }
    assert_eq!(count_failed_parsing_backups(&working_dir)?, 1);

    fs::write(catalog.collection_path(), "{ broken differently")?;
    for _ in 0..3 {
        assert!(catalog.load_all().is_empty());
    }
    assert_eq!(count_failed_parsing_backups(&working_dir)?, 2);

    Ok(())
}

#[test]
fn json_atomic_rename_concurrent_writers_all_succeed() -> Result<(), Box<dyn Error>> {
    init_tracing_for_tests();

    let (working_dir, _temp_dir_drop_guard) =
        create_temp_working_dir("atomic_concurrent", JsonStore::NAME);

    let config = StoreConfig {
        write_mode: WriteMode::AtomicRename,
        ..Default::default()
    };
    let catalog =
        Catalog::new(JsonStore::with_config(&working_dir, config)?).with_clock(midsummer);
    catalog.add(dune())?;

    for _ in 0..20 {
        let results: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| catalog.toggle_checkout("1")))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().expect("writer thread should not panic"))
                .collect()
        });

        for result in results {
            assert_eq!(result?, MutationOutcome::Updated);
        }
    }

    assert_eq!(catalog.load_all().len(), 1);
    assert_eq!(sorted_file_names(&working_dir)?, ["books.json"]);

    Ok(())
}
