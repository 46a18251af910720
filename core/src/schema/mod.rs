//! Table schemas
//!
//! This module provides the typed column model a table version is built on.
//! A schema is an ordered collection of tagged columns from which the
//! primary-key and non-key column subsets are derived, both ordered by tag.

mod column;
mod validator;

pub use column::{ColCollection, Column, Constraint};
pub use validator::SchemaValidator;

use crate::error::{CoreError, Result};
use crate::row::{Row, TaggedValues};

/// Schema of a table version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    all_cols: ColCollection,
    pk_cols: ColCollection,
    non_pk_cols: ColCollection,
}

impl Schema {
    /// Create a schema from a column collection
    ///
    /// At least one column must be part of the primary key.
    pub fn from_cols(all_cols: ColCollection) -> Result<Self> {
        let pk_cols = all_cols.filter_sorted_by_tag(|col| col.is_part_of_pk);
        if pk_cols.is_empty() {
            return Err(CoreError::InvalidSchema(
                "schema has no primary key columns".to_string(),
            ));
        }
        let non_pk_cols = all_cols.filter_sorted_by_tag(|col| !col.is_part_of_pk);

        Ok(Schema {
            all_cols,
            pk_cols,
            non_pk_cols,
        })
    }

    /// All columns in declaration order
    pub fn get_all_cols(&self) -> &ColCollection {
        &self.all_cols
    }

    /// Primary-key columns ordered by tag
    pub fn get_pk_cols(&self) -> &ColCollection {
        &self.pk_cols
    }

    /// Non-key columns ordered by tag
    pub fn get_non_pk_cols(&self) -> &ColCollection {
        &self.non_pk_cols
    }

    /// Convert positional key arguments into primary-key tagged values
    ///
    /// The i-th argument is converted to the kind of the i-th primary-key
    /// column. Fails with `SchemaMismatch` when the argument count differs
    /// from the primary-key column count.
    pub fn key_values_from_args(&self, key: &[serde_json::Value]) -> Result<TaggedValues> {
        if key.len() != self.pk_cols.len() {
            return Err(CoreError::SchemaMismatch(format!(
                "key must specify all {} primary key columns, got {}",
                self.pk_cols.len(),
                key.len()
            )));
        }

        let mut tagged_vals = TaggedValues::new();
        for (col, arg) in self.pk_cols.iter().zip(key) {
            tagged_vals.set(col.tag, col.kind.convert(arg)?);
        }

        Ok(tagged_vals)
    }

    /// Validate a row against this schema
    pub fn validate_row(&self, row: &Row) -> Result<()> {
        SchemaValidator::validate_row(self, row)
    }
}
