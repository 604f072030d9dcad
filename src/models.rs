//! Domain models that mirror the SQLite schema. These stay plain data holders
//! so the persistence layer and the TUI can share them without conversions.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A registered student. The id is chosen by whoever fills in the form, not
/// generated by the database.
pub struct Student {
    pub student_id: i64,
    pub student_name: String,
    pub course: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A catalogued book, keyed by a caller-supplied id like [`Student`].
pub struct Book {
    pub book_id: i64,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Records that a book was lent to a student on a given day.
pub struct BookIssue {
    /// Assigned by SQLite. `AUTOINCREMENT` keeps it strictly increasing.
    pub issue_id: i64,
    /// Soft reference; the row may not exist.
    pub student_id: i64,
    /// Soft reference; the row may not exist.
    pub book_id: i64,
    pub issue_date: NaiveDate,
}

impl BookIssue {
    /// Confirmation text shown after a successful issue.
    pub fn summary(&self) -> String {
        format!(
            "Book ID {} issued to Student ID {} on {}.",
            self.book_id,
            self.student_id,
            self.issue_date.format("%Y-%m-%d")
        )
    }
}

/// The three tables the application knows about. The variant decides the SQL
/// table name as well as the column labels used by table windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Students,
    Books,
    BookIssues,
}

impl Table {
    pub const ALL: [Table; 3] = [Table::Students, Table::Books, Table::BookIssues];

    /// Name of the table inside the SQLite file.
    pub fn sql_name(self) -> &'static str {
        match self {
            Table::Students => "Students",
            Table::Books => "Books",
            Table::BookIssues => "BookIssues",
        }
    }

    /// Human-readable column headings, in declaration order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Students => &["Student ID", "Name", "Course"],
            Table::Books => &["Book ID", "Title", "Author"],
            Table::BookIssues => &["Issue ID", "Student ID", "Book ID", "Issue Date"],
        }
    }

    /// Declared column names, matching [`Self::columns`] one to one.
    pub fn sql_columns(self) -> &'static [&'static str] {
        match self {
            Table::Students => &["student_id", "student_name", "course"],
            Table::Books => &["book_id", "title", "author"],
            Table::BookIssues => &["issue_id", "student_id", "book_id", "issue_date"],
        }
    }

    /// Window title for a table view.
    pub fn title(self) -> String {
        format!("{} Table", self.sql_name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

/// A fully materialized table, already converted to display strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub table: Table,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn columns(&self) -> &'static [&'static str] {
        self.table.columns()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
