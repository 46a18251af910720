//! Per-query context

use uuid::Uuid;

/// Context for one query, passed through to table lookups unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContext {
    id: Uuid,
}

impl QueryContext {
    /// Create a context with a fresh query id
    pub fn new() -> Self {
        QueryContext { id: Uuid::new_v4() }
    }

    /// Create a context for a known query id
    pub fn with_id(id: Uuid) -> Self {
        QueryContext { id }
    }

    /// Query id
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new()
    }
}
