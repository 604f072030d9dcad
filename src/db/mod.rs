//! Persistence module split across logical submodules.

mod books;
mod connection;
mod issues;
mod students;
mod tables;

pub use books::{book_exists, insert_book};
pub use connection::{ensure_schema, Store};
pub use issues::insert_issue;
pub use students::{insert_student, student_exists};
pub use tables::read_table;
