/// Versioned Rowstore - typed table rows stored in content-addressed persistent maps
///
/// This is the root crate that provides workspace-level documentation.
/// Actual implementation is in the subcrates:
/// - `rowstore-core`: Schemas, tagged rows, persistent maps, map writers and readers
/// - `rowstore-sql`: Primary-key index and point lookups for the query engine

/// Returns the version of the package.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
