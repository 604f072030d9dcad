use anyhow::Context;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::map_insert_error;
use crate::error::WriteResult;
use crate::models::Student;

/// Insert a student row. A taken `student_id` comes back as
/// [`crate::LibraryError::DuplicateId`].
pub fn insert_student(conn: &Connection, student: &Student) -> WriteResult<()> {
    conn.execute(
        "INSERT INTO Students (student_id, student_name, course) VALUES (?1, ?2, ?3)",
        params![student.student_id, student.student_name, student.course],
    )
    .map_err(|err| {
        map_insert_error(err, "Student", student.student_id, "failed to insert student")
    })?;
    Ok(())
}

pub fn student_exists(conn: &Connection, student_id: i64) -> WriteResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM Students WHERE student_id = ?1",
            [student_id],
            |_| Ok(()),
        )
        .optional()
        .context("failed to look up student")?;
    Ok(found.is_some())
}
