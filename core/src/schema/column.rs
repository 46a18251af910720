//! Columns and column collections

use std::collections::{BTreeMap, HashMap};
use serde::{Serialize, Deserialize};

use crate::error::{CoreError, Result};
use crate::types::Kind;

/// Constraint on a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// The column must always hold a non-null value
    NotNull,
}

/// Definition of a column
///
/// The tag is the durable identity of the column; the name is cosmetic and
/// may change between schema versions while the tag stays fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Name of the column
    pub name: String,

    /// Stable numeric identifier, unique within a schema
    pub tag: u64,

    /// Kind of value the column holds
    pub kind: Kind,

    /// Whether the column is part of the primary key
    pub is_part_of_pk: bool,

    /// Constraints on the column's values
    pub constraints: Vec<Constraint>,
}

impl Column {
    /// Create a new column
    pub fn new(
        name: impl Into<String>,
        tag: u64,
        kind: Kind,
        is_part_of_pk: bool,
        constraints: Vec<Constraint>,
    ) -> Self {
        Column {
            name: name.into(),
            tag,
            kind,
            is_part_of_pk,
            constraints,
        }
    }

    /// Whether the column may be absent or null
    pub fn is_nullable(&self) -> bool {
        !self.constraints.contains(&Constraint::NotNull)
    }
}

/// An ordered collection of columns with unique tags and names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColCollection {
    cols: Vec<Column>,
    by_tag: BTreeMap<u64, usize>,
    by_name: HashMap<String, usize>,
}

impl ColCollection {
    /// Create a collection, rejecting duplicate tags or names
    pub fn new(cols: Vec<Column>) -> Result<Self> {
        let mut by_tag = BTreeMap::new();
        let mut by_name = HashMap::new();

        for (i, col) in cols.iter().enumerate() {
            if by_tag.insert(col.tag, i).is_some() {
                return Err(CoreError::InvalidSchema(format!(
                    "duplicate column tag {}",
                    col.tag
                )));
            }
            if by_name.insert(col.name.clone(), i).is_some() {
                return Err(CoreError::InvalidSchema(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        Ok(ColCollection { cols, by_tag, by_name })
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Iterate over the columns in collection order
    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.cols.iter()
    }

    /// Tags in collection order
    pub fn tags(&self) -> Vec<u64> {
        self.cols.iter().map(|col| col.tag).collect()
    }

    /// Get a column by tag
    pub fn get_by_tag(&self, tag: u64) -> Option<&Column> {
        self.by_tag.get(&tag).map(|i| &self.cols[*i])
    }

    /// Get a column by name
    pub fn get_by_name(&self, name: &str) -> Option<&Column> {
        self.by_name.get(name).map(|i| &self.cols[*i])
    }

    /// Check if a tag belongs to the collection
    pub fn contains_tag(&self, tag: u64) -> bool {
        self.by_tag.contains_key(&tag)
    }

    /// A new collection holding the columns that match `pred`, ordered by tag
    pub(crate) fn filter_sorted_by_tag<F>(&self, pred: F) -> ColCollection
    where
        F: Fn(&Column) -> bool,
    {
        let cols: Vec<Column> = self
            .by_tag
            .values()
            .map(|i| &self.cols[*i])
            .filter(|col| pred(col))
            .cloned()
            .collect();

        let by_tag = cols.iter().enumerate().map(|(i, col)| (col.tag, i)).collect();
        let by_name = cols.iter().enumerate().map(|(i, col)| (col.name.clone(), i)).collect();
        ColCollection { cols, by_tag, by_name }
    }
}
