use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::map_insert_error;
use crate::error::WriteResult;
use crate::models::Book;

/// Insert a book row, reporting a taken `book_id` as a duplicate.
pub fn insert_book(conn: &Connection, book: &Book) -> WriteResult<()> {
    conn.execute(
        "INSERT INTO Books (book_id, title, author) VALUES (?1, ?2, ?3)",
        params![book.book_id, book.title, book.author],
    )
    .map_err(|err| map_insert_error(err, "Book", book.book_id, "failed to insert book"))?;
    Ok(())
}

pub fn book_exists(conn: &Connection, book_id: i64) -> WriteResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM Books WHERE book_id = ?1", [book_id], |_| Ok(()))
        .optional()
        .context("failed to look up book")?;
    Ok(found.is_some())
}
