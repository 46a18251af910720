//! Ordered value tuples
//!
//! A tuple is the unit stored on both sides of a persistent map entry.
//! Tuples compare lexicographically, which gives the map its iteration order.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use serde::{Serialize, Deserialize};

use super::value::Value;

/// An ordered sequence of values
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tuple(Vec<Value>);

impl Debug for Tuple {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl Tuple {
    /// Create a tuple from values
    pub fn new(values: Vec<Value>) -> Self {
        Tuple(values)
    }

    /// Number of values in the tuple
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the tuple is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get a value by position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Iterate over the values
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// The values as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    /// Consume the tuple, returning its values
    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(values: Vec<Value>) -> Self {
        Tuple(values)
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Tuple(iter.into_iter().collect())
    }
}
