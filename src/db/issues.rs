use anyhow::Context;
use chrono::NaiveDate;
use rusqlite::{params, Connection};

use crate::error::WriteResult;
use crate::models::BookIssue;

/// Record a book issue and echo back the row with the id SQLite assigned.
pub fn insert_issue(
    conn: &Connection,
    student_id: i64,
    book_id: i64,
    issue_date: NaiveDate,
) -> WriteResult<BookIssue> {
    conn.execute(
        "INSERT INTO BookIssues (student_id, book_id, issue_date) VALUES (?1, ?2, ?3)",
        params![student_id, book_id, issue_date],
    )
    .context("failed to insert book issue")?;

    Ok(BookIssue {
        issue_id: conn.last_insert_rowid(),
        student_id,
        book_id,
        issue_date,
    })
}
