//! Rows in the shape the query engine consumes

use rowstore_core::{Row, Schema, Value};

/// A row as a list of values in schema declaration order
pub type SqlRow = Vec<Value>;

/// Convert a stored row to a SQL row
///
/// Columns absent from the row become `Null`.
pub fn row_to_sql_row(row: &Row, sch: &Schema) -> SqlRow {
    sch.get_all_cols()
        .iter()
        .map(|col| row.get_col_val(col.tag).cloned().unwrap_or(Value::Null))
        .collect()
}
