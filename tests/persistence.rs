use std::path::PathBuf;

use library_desk::{read_table, RecordWriter, Store, Table, ValidationPolicy};
use tempfile::TempDir;
use test_context::{test_context, TestContext};

struct LibraryFile {
    dir: TempDir,
}

impl LibraryFile {
    /// Nested path so `Store::open` has to create the parent directory.
    fn db_path(&self) -> PathBuf {
        self.dir.path().join("data").join("library_management.db")
    }
}

impl TestContext for LibraryFile {
    fn setup() -> Self {
        LibraryFile {
            dir: tempfile::tempdir().unwrap(),
        }
    }
}

#[test_context(LibraryFile)]
#[test]
fn rows_survive_reopening_the_file(ctx: &mut LibraryFile) {
    let store = Store::open(&ctx.db_path()).unwrap();
    {
        let writer = RecordWriter::new(&store, ValidationPolicy::default());
        writer.add_student("1", "Ann", "History").unwrap();
        writer.add_book("1", "Dune", "Herbert").unwrap();
    }
    store.close().unwrap();

    assert!(ctx.db_path().exists());

    let store = Store::open(&ctx.db_path()).unwrap();
    let students = read_table(store.conn(), Table::Students).unwrap();
    let books = read_table(store.conn(), Table::Books).unwrap();
    assert_eq!(students.rows, vec![vec!["1", "Ann", "History"]]);
    assert_eq!(books.rows, vec![vec!["1", "Dune", "Herbert"]]);
}

#[test_context(LibraryFile)]
#[test]
fn issue_ids_keep_increasing_across_sessions(ctx: &mut LibraryFile) {
    let store = Store::open(&ctx.db_path()).unwrap();
    let first = RecordWriter::new(&store, ValidationPolicy::default())
        .issue_book("42", "1")
        .unwrap();
    store.close().unwrap();

    let store = Store::open(&ctx.db_path()).unwrap();
    let second = RecordWriter::new(&store, ValidationPolicy::default())
        .issue_book("42", "1")
        .unwrap();

    assert!(second.issue_id > first.issue_id);
    let issues = read_table(store.conn(), Table::BookIssues).unwrap();
    assert_eq!(issues.len(), 2);
}

#[test_context(LibraryFile)]
#[test]
fn existing_tables_are_left_alone(ctx: &mut LibraryFile) {
    std::fs::create_dir_all(ctx.db_path().parent().unwrap()).unwrap();
    {
        let conn = rusqlite::Connection::open(ctx.db_path()).unwrap();
        conn.execute(
            "CREATE TABLE Books (book_id INTEGER PRIMARY KEY, title TEXT NOT NULL, author TEXT NOT NULL, shelf TEXT)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO Books (book_id, title, author, shelf) VALUES (9, 'Emma', 'Austen', 'B2')",
            [],
        )
        .unwrap();
    }

    let store = Store::open(&ctx.db_path()).unwrap();
    let books = read_table(store.conn(), Table::Books).unwrap();

    // The row survived, so the table was not recreated; the extra column is
    // left out of the view.
    assert_eq!(books.rows, vec![vec!["9", "Emma", "Austen"]]);
    assert!(books.rows.iter().all(|row| row.len() == books.columns().len()));

    let shelf: String = store
        .conn()
        .query_row("SELECT shelf FROM Books WHERE book_id = 9", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(shelf, "B2");
}
