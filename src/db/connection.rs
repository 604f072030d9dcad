use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{ffi, Connection, Error as SqlError};
use tracing::{debug, info};

use crate::error::LibraryError;

/// Owned handle to the library database. It is opened once at startup, lent
/// to the reader and writer, and closed explicitly on shutdown.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the SQLite file at `path` and make sure the schema is
    /// in place. Missing parent directories are created first.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("failed to create data directory")?;
            }
        }

        let conn = Connection::open(path).context("failed to open SQLite database")?;
        ensure_schema(&conn)?;
        info!(path = %path.display(), "library database opened");
        Ok(Self { conn })
    }

    /// Private database used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Borrow the live connection for the query helpers.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Release the connection, reporting any error SQLite raises while
    /// finalizing it.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .context("failed to close SQLite database")?;
        debug!("library database closed");
        Ok(())
    }
}

/// Create the three library tables when they are missing. Existing tables are
/// never altered, so running this on every start is safe.
///
/// Foreign keys are declared for documentation only: enforcement stays off so
/// that issuing a book to an unknown student is accepted.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = OFF", [])
        .context("failed to configure foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Students (
            student_id INTEGER PRIMARY KEY,
            student_name TEXT NOT NULL,
            course TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create Students table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS Books (
            book_id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create Books table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS BookIssues (
            issue_id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id INTEGER,
            book_id INTEGER,
            issue_date DATE,
            FOREIGN KEY (student_id) REFERENCES Students (student_id),
            FOREIGN KEY (book_id) REFERENCES Books (book_id)
        )",
        [],
    )
    .context("failed to create BookIssues table")?;

    Ok(())
}

/// Turn a primary-key collision into [`LibraryError::DuplicateId`]; every
/// other failure keeps its SQLite message under `context`.
pub(crate) fn map_insert_error(
    err: SqlError,
    entity: &'static str,
    id: i64,
    context: &'static str,
) -> LibraryError {
    match &err {
        SqlError::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            LibraryError::DuplicateId { entity, id }
        }
        _ => LibraryError::Storage(anyhow::Error::new(err).context(context)),
    }
}
