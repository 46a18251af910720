//! Tagged rows
//!
//! This module provides the row representation: a mapping from column tag
//! to value, checked against a schema on construction. Equality and
//! formatting are driven by the schema's column order.

mod encoding;

pub use encoding::key_tuple;

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use serde::{Serialize, Deserialize};

use crate::error::{CoreError, Result};
use crate::schema::Schema;
use crate::types::Value;

/// A set of values keyed by column tag
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedValues(BTreeMap<u64, Value>);

impl Debug for TaggedValues {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

impl TaggedValues {
    /// Create an empty set
    pub fn new() -> Self {
        TaggedValues(BTreeMap::new())
    }

    /// Get the value for a tag
    pub fn get(&self, tag: u64) -> Option<&Value> {
        self.0.get(&tag)
    }

    /// Set the value for a tag, returning the previous value
    pub fn set(&mut self, tag: u64, value: Value) -> Option<Value> {
        self.0.insert(tag, value)
    }

    /// Check if a tag has a value
    pub fn contains_tag(&self, tag: u64) -> bool {
        self.0.contains_key(&tag)
    }

    /// Number of tagged values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tagged values in ascending tag order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Value)> + '_ {
        self.0.iter().map(|(tag, value)| (*tag, value))
    }
}

impl FromIterator<(u64, Value)> for TaggedValues {
    fn from_iter<I: IntoIterator<Item = (u64, Value)>>(iter: I) -> Self {
        TaggedValues(iter.into_iter().collect())
    }
}

/// A row of a table
#[derive(Clone, PartialEq, Eq)]
pub struct Row {
    vals: TaggedValues,
}

impl Debug for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Row {{ values: {:?} }}", self.vals)
    }
}

impl Row {
    /// Create a row for a schema
    ///
    /// Every tag must belong to the schema.
    pub fn new(sch: &Schema, vals: TaggedValues) -> Result<Self> {
        let all_cols = sch.get_all_cols();
        if let Some((tag, _)) = vals.iter().find(|(tag, _)| !all_cols.contains_tag(*tag)) {
            return Err(CoreError::SchemaMismatch(format!(
                "tag {} is not a column of the schema",
                tag
            )));
        }

        Ok(Row { vals })
    }

    /// Get the value for a column tag
    pub fn get_col_val(&self, tag: u64) -> Option<&Value> {
        self.vals.get(tag)
    }

    /// Iterate over the row's tagged values
    pub fn iter(&self) -> impl Iterator<Item = (u64, &Value)> + '_ {
        self.vals.iter()
    }

    /// The row's tagged values
    pub fn tagged_values(&self) -> &TaggedValues {
        &self.vals
    }

    /// The row's values for the primary-key columns
    pub fn key_values(&self, sch: &Schema) -> TaggedValues {
        sch.get_pk_cols()
            .iter()
            .filter_map(|col| self.vals.get(col.tag).map(|v| (col.tag, v.clone())))
            .collect()
    }
}

/// Check whether two rows hold equal values for every column of a schema
///
/// A column absent from both rows counts as equal.
pub fn are_equal(a: &Row, b: &Row, sch: &Schema) -> bool {
    sch.get_all_cols()
        .iter()
        .all(|col| a.get_col_val(col.tag) == b.get_col_val(col.tag))
}

/// Format a row using the schema's column names and order
pub fn fmt(row: &Row, sch: &Schema) -> String {
    let fields: Vec<String> = sch
        .get_all_cols()
        .iter()
        .map(|col| match row.get_col_val(col.tag) {
            Some(value) => format!("{}: {}", col.name, value),
            None => format!("{}: <absent>", col.name),
        })
        .collect();

    format!("{{ {} }}", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColCollection, Column, Constraint};
    use crate::types::Kind;

    fn sample_schema() -> Schema {
        let cols = ColCollection::new(vec![
            Column::new("id", 1, Kind::Uint, true, vec![Constraint::NotNull]),
            Column::new("name", 2, Kind::String, false, vec![]),
            Column::new("score", 3, Kind::Float, false, vec![]),
        ])
        .unwrap();
        Schema::from_cols(cols).unwrap()
    }

    fn vals(pairs: Vec<(u64, Value)>) -> TaggedValues {
        pairs.into_iter().collect()
    }

    #[test]
    fn test_row_rejects_unknown_tag() {
        let sch = sample_schema();
        let result = Row::new(&sch, vals(vec![(1, Value::Uint(1)), (9, Value::Bool(true))]));
        assert!(matches!(result, Err(CoreError::SchemaMismatch(_))));
    }

    #[test]
    fn test_are_equal() {
        let sch = sample_schema();
        let a = Row::new(&sch, vals(vec![(1, Value::Uint(1)), (2, Value::from("x"))])).unwrap();
        let b = Row::new(&sch, vals(vec![(2, Value::from("x")), (1, Value::Uint(1))])).unwrap();
        let c = Row::new(&sch, vals(vec![(1, Value::Uint(1)), (2, Value::from("y"))])).unwrap();
        let d = Row::new(&sch, vals(vec![(1, Value::Uint(1))])).unwrap();

        assert!(are_equal(&a, &b, &sch));
        assert!(!are_equal(&a, &c, &sch));
        assert!(!are_equal(&a, &d, &sch));
    }

    #[test]
    fn test_fmt() {
        let sch = sample_schema();
        let row = Row::new(&sch, vals(vec![(1, Value::Uint(7)), (2, Value::from("Ann"))])).unwrap();
        assert_eq!(fmt(&row, &sch), "{ id: 7, name: \"Ann\", score: <absent> }");
    }

    #[test]
    fn test_key_values() {
        let sch = sample_schema();
        let row = Row::new(&sch, vals(vec![(1, Value::Uint(7)), (2, Value::from("Ann"))])).unwrap();
        let key = row.key_values(&sch);
        assert_eq!(key.len(), 1);
        assert_eq!(key.get(1), Some(&Value::Uint(7)));
    }
}
