//! Core library surface for the Library Desk TUI: a small form-and-table
//! front-end over a single SQLite file holding students, books and book
//! issues.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod records;
pub mod ui;

/// Startup pieces used by `main.rs`.
pub use config::{Config, ValidationPolicy};
pub use db::{ensure_schema, read_table, Store};
pub use logging::init_logging;

pub use error::LibraryError;
pub use models::{Book, BookIssue, Student, Table, TableView};
pub use records::RecordWriter;

/// The interactive application entry point and state container.
pub use ui::{run_app, Action, App};
