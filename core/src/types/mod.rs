//! Value model
//!
//! This module provides the value kinds columns declare, the values rows
//! carry, and the tuples persistent maps store.

mod value;
mod tuple;

pub use value::{Kind, Value};
pub use tuple::Tuple;
