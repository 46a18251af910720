//! Row encoding to and from map entries
//!
//! A row is stored as a key tuple and a value tuple. Both are flat lists of
//! `Uint(tag), value` pairs. The key tuple lists every primary-key column in
//! primary-key order; the value tuple lists the non-key columns present in
//! the row, in ascending tag order.

use crate::error::{CoreError, Result};
use crate::schema::{Column, Schema};
use crate::types::{Kind, Tuple, Value};
use super::{Row, TaggedValues};

/// Encode primary-key tagged values into a key tuple
pub fn key_tuple(sch: &Schema, key: &TaggedValues) -> Result<Tuple> {
    let pk_cols = sch.get_pk_cols();
    let mut values = Vec::with_capacity(pk_cols.len() * 2);

    for col in pk_cols.iter() {
        let value = key.get(col.tag).ok_or_else(|| {
            CoreError::SchemaMismatch(format!("missing value for primary key column '{}'", col.name))
        })?;
        values.push(Value::Uint(col.tag));
        values.push(value.clone());
    }

    Ok(Tuple::new(values))
}

impl Row {
    /// Encode the row's primary-key values into a key tuple
    pub fn key_tuple(&self, sch: &Schema) -> Result<Tuple> {
        key_tuple(sch, &self.vals)
    }

    /// Encode the row's non-key values into a value tuple
    pub fn value_tuple(&self, sch: &Schema) -> Tuple {
        sch.get_non_pk_cols()
            .iter()
            .filter_map(|col| self.vals.get(col.tag).map(|v| (col.tag, v)))
            .flat_map(|(tag, v)| [Value::Uint(tag), v.clone()])
            .collect()
    }

    /// Decode a row from a key tuple and a value tuple
    ///
    /// Any structural problem with either tuple is reported as
    /// `MalformedRow`.
    pub fn from_tuples(sch: &Schema, key: &Tuple, value: &Tuple) -> Result<Row> {
        let mut vals = TaggedValues::new();

        let pk_cols = sch.get_pk_cols();
        if key.len() != pk_cols.len() * 2 {
            return Err(CoreError::MalformedRow(format!(
                "key tuple has {} values, expected {}",
                key.len(),
                pk_cols.len() * 2
            )));
        }
        for (col, pair) in pk_cols.iter().zip(key.as_slice().chunks(2)) {
            if pair[0].as_tag() != Some(col.tag) {
                return Err(CoreError::MalformedRow(format!(
                    "key tuple slot for column '{}' holds {:?}, expected tag {}",
                    col.name, pair[0], col.tag
                )));
            }
            check_kind(col, &pair[1])?;
            vals.set(col.tag, pair[1].clone());
        }

        if value.len() % 2 != 0 {
            return Err(CoreError::MalformedRow(format!(
                "value tuple has odd length {}",
                value.len()
            )));
        }
        let non_pk_cols = sch.get_non_pk_cols();
        let mut last_tag = None;
        for pair in value.as_slice().chunks(2) {
            let tag = pair[0].as_tag().ok_or_else(|| {
                CoreError::MalformedRow(format!("value tuple tag slot holds {:?}", pair[0]))
            })?;
            if last_tag.map_or(false, |last| tag <= last) {
                return Err(CoreError::MalformedRow(format!(
                    "value tuple tag {} is duplicated or out of order",
                    tag
                )));
            }
            let col = non_pk_cols.get_by_tag(tag).ok_or_else(|| {
                CoreError::MalformedRow(format!("value tuple tag {} is not a non-key column", tag))
            })?;
            check_kind(col, &pair[1])?;
            vals.set(tag, pair[1].clone());
            last_tag = Some(tag);
        }

        Ok(Row { vals })
    }
}

fn check_kind(col: &Column, value: &Value) -> Result<()> {
    match value.kind() {
        Kind::Null if col.is_nullable() => Ok(()),
        kind if kind == col.kind => Ok(()),
        kind => Err(CoreError::MalformedRow(format!(
            "column '{}' holds a {} value, expected {}",
            col.name, kind, col.kind
        ))),
    }
}
