//! Record writer: turns raw form text into validated rows. Every call either
//! writes exactly one row (autocommit) or returns an error and writes nothing.

use chrono::{Local, NaiveDate};
use tracing::{error, info, warn};

use crate::config::ValidationPolicy;
use crate::db::{book_exists, insert_book, insert_issue, insert_student, student_exists, Store};
use crate::error::{LibraryError, WriteResult};
use crate::models::{Book, BookIssue, Student};

const MISSING_FIELDS: &str = "All fields are required.";

/// Validates form input and writes it through a borrowed [`Store`]. Text is
/// stored exactly as entered; only the presence check ignores whitespace.
pub struct RecordWriter<'a> {
    store: &'a Store,
    policy: ValidationPolicy,
}

impl<'a> RecordWriter<'a> {
    pub fn new(store: &'a Store, policy: ValidationPolicy) -> Self {
        Self { store, policy }
    }

    /// Insert one student. Nothing is written when a field is blank or the id
    /// is not an integer.
    pub fn add_student(&self, id: &str, name: &str, course: &str) -> WriteResult<Student> {
        require_all(&[id, name, course])?;
        let student = Student {
            student_id: parse_id(id, "Student ID")?,
            student_name: name.to_string(),
            course: course.to_string(),
        };

        insert_student(self.store.conn(), &student).inspect_err(log_rejection)?;
        info!(student_id = student.student_id, "student added");
        Ok(student)
    }

    /// Insert one book, with the same checks as [`Self::add_student`].
    pub fn add_book(&self, id: &str, title: &str, author: &str) -> WriteResult<Book> {
        require_all(&[id, title, author])?;
        let book = Book {
            book_id: parse_id(id, "Book ID")?,
            title: title.to_string(),
            author: author.to_string(),
        };

        insert_book(self.store.conn(), &book).inspect_err(log_rejection)?;
        info!(book_id = book.book_id, "book added");
        Ok(book)
    }

    /// Issue a book dated today (local time).
    pub fn issue_book(&self, student_id: &str, book_id: &str) -> WriteResult<BookIssue> {
        self.issue_book_on(student_id, book_id, Local::now().date_naive())
    }

    /// Issue a book with an explicit date. Dangling ids are only refused when
    /// the policy asks for it.
    pub fn issue_book_on(
        &self,
        student_id: &str,
        book_id: &str,
        issue_date: NaiveDate,
    ) -> WriteResult<BookIssue> {
        require_all(&[student_id, book_id])?;
        let student_id = parse_id(student_id, "Student ID")?;
        let book_id = parse_id(book_id, "Book ID")?;

        if self.policy.reject_dangling_references {
            self.check_references(student_id, book_id)
                .inspect_err(log_rejection)?;
        }

        let issue = insert_issue(self.store.conn(), student_id, book_id, issue_date)
            .inspect_err(log_rejection)?;
        info!(issue_id = issue.issue_id, student_id, book_id, "book issued");
        Ok(issue)
    }

    fn check_references(&self, student_id: i64, book_id: i64) -> WriteResult<()> {
        let conn = self.store.conn();
        if !student_exists(conn, student_id)? {
            return Err(LibraryError::DanglingReference {
                entity: "Student",
                id: student_id,
            });
        }
        if !book_exists(conn, book_id)? {
            return Err(LibraryError::DanglingReference {
                entity: "Book",
                id: book_id,
            });
        }
        Ok(())
    }
}

/// Presence check shared by all three forms. Whitespace-only input counts as
/// missing.
fn require_all(fields: &[&str]) -> WriteResult<()> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        warn!("rejected input with empty fields");
        return Err(LibraryError::Validation(MISSING_FIELDS.to_string()));
    }
    Ok(())
}

fn parse_id(raw: &str, label: &str) -> WriteResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        warn!(field = label, value = raw, "rejected non-integer id");
        LibraryError::Validation(format!("{label} must be an integer."))
    })
}

fn log_rejection(err: &LibraryError) {
    match err {
        LibraryError::Storage(cause) => error!(error = %format!("{cause:#}"), "write failed"),
        other => warn!(error = %other, "write rejected"),
    }
}
