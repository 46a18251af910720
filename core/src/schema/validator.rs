//! Row validation
//!
//! This module checks rows against the schema of the table they are
//! written to.

use crate::error::{CoreError, Result};
use crate::row::Row;
use crate::types::Kind;
use super::Schema;

/// Schema validator
#[derive(Debug, Clone)]
pub struct SchemaValidator;

impl SchemaValidator {
    /// Validate a row against a schema
    ///
    /// Every tag must belong to the schema, every value must be of its
    /// column's kind (or null for a nullable column), and every NOT NULL
    /// column must be present.
    pub fn validate_row(sch: &Schema, row: &Row) -> Result<()> {
        let all_cols = sch.get_all_cols();

        for (tag, value) in row.iter() {
            let col = all_cols.get_by_tag(tag).ok_or_else(|| {
                CoreError::SchemaMismatch(format!("row has value for unknown tag {}", tag))
            })?;

            match value.kind() {
                Kind::Null if col.is_nullable() => {}
                Kind::Null => {
                    return Err(CoreError::ConstraintViolation {
                        column: col.name.clone(),
                    })
                }
                kind if kind == col.kind => {}
                kind => {
                    return Err(CoreError::TypeMismatch {
                        expected: col.kind,
                        found: format!("{} value for column '{}'", kind, col.name),
                    })
                }
            }
        }

        for col in all_cols.iter() {
            if !col.is_nullable() && row.get_col_val(col.tag).is_none() {
                return Err(CoreError::ConstraintViolation {
                    column: col.name.clone(),
                });
            }
        }

        Ok(())
    }
}
