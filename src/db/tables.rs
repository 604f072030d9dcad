use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use crate::models::{Table, TableView};

/// Load every row of `table` in whatever order SQLite hands them back. No
/// ORDER BY, filtering or paging is applied; for these schemas a plain scan
/// walks rowid order. Only the declared columns are selected, so each row has
/// one cell per heading even if the file's table carries extra columns.
pub fn read_table(conn: &Connection, table: Table) -> Result<TableView> {
    let sql = format!(
        "SELECT {} FROM {}",
        table.sql_columns().join(", "),
        table.sql_name()
    );
    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("failed to prepare {table} query"))?;
    let width = stmt.column_count();

    let mut rows = stmt
        .query([])
        .with_context(|| format!("failed to query {table}"))?;

    let mut collected = Vec::new();
    while let Some(row) = rows
        .next()
        .with_context(|| format!("failed to fetch {table} row"))?
    {
        let mut cells = Vec::with_capacity(width);
        for idx in 0..width {
            let value = row
                .get_ref(idx)
                .with_context(|| format!("failed to read {table} column {idx}"))?;
            cells.push(render_value(value));
        }
        collected.push(cells);
    }

    Ok(TableView {
        table,
        rows: collected,
    })
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(_) => "<blob>".to_string(),
    }
}
