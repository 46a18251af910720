//! Map readers
//!
//! A reader decodes the entries of a persistent map back into rows, in
//! ascending primary-key order. Entries that fail to decode surface as
//! `MalformedRow` errors; [`read_all_rows`] and [`pipe_rows`] either abort on
//! the first one or skip it and count it, as the caller chooses.

use std::sync::Arc;
use log::{debug, warn};

use crate::error::Result;
use crate::map::{MapIter, PersistentMap};
use crate::row::Row;
use crate::schema::Schema;
use super::writer::MapWriteCloser;

/// A forward-only source of rows
pub trait TableReader {
    /// Schema the rows are decoded with
    fn schema(&self) -> &Schema;

    /// Read the next row
    ///
    /// Returns `Ok(None)` at the end of the sequence. An error for one entry
    /// does not end the sequence; the next call moves on to the next entry.
    fn read_row(&mut self) -> Result<Option<Row>>;
}

/// Reads the rows of a persistent map
///
/// The reader walks the snapshot it was created from; later maps derived
/// from that snapshot do not affect it. Restart by creating a new reader.
pub struct MapReader {
    schema: Arc<Schema>,
    entries: MapIter,
}

impl MapReader {
    /// Create a reader over a map
    pub fn new(map: &PersistentMap, schema: Arc<Schema>) -> Self {
        MapReader {
            schema,
            entries: map.iter(),
        }
    }
}

impl TableReader for MapReader {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn read_row(&mut self) -> Result<Option<Row>> {
        match self.entries.next() {
            Some((key, value)) => Row::from_tuples(&self.schema, &key, &value).map(Some),
            None => Ok(None),
        }
    }
}

impl Iterator for MapReader {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_row().transpose()
    }
}

/// Read every row from a reader
///
/// Returns the decoded rows and the number of malformed entries skipped.
/// With `continue_on_bad_row` unset the first malformed entry aborts the
/// read. Errors other than malformed entries always abort.
pub fn read_all_rows<R: TableReader + ?Sized>(
    reader: &mut R,
    continue_on_bad_row: bool,
) -> Result<(Vec<Row>, usize)> {
    let mut rows = Vec::new();
    let mut bad_rows = 0;

    loop {
        match reader.read_row() {
            Ok(Some(row)) => rows.push(row),
            Ok(None) => break,
            Err(e) if continue_on_bad_row && e.is_bad_row() => {
                warn!("skipping bad row: {}", e);
                bad_rows += 1;
            }
            Err(e) => return Err(e),
        }
    }

    debug!("read {} rows ({} bad)", rows.len(), bad_rows);
    Ok((rows, bad_rows))
}

/// Copy every row from a reader into a writer
///
/// Returns the number of rows written and the number of malformed entries
/// skipped. The writer is left open.
pub fn pipe_rows<R, W>(
    reader: &mut R,
    writer: &mut W,
    continue_on_bad_row: bool,
) -> Result<(usize, usize)>
where
    R: TableReader + ?Sized,
    W: MapWriteCloser + ?Sized,
{
    let mut written = 0;
    let mut bad_rows = 0;

    loop {
        match reader.read_row() {
            Ok(Some(row)) => {
                writer.write_row(&row)?;
                written += 1;
            }
            Ok(None) => break,
            Err(e) if continue_on_bad_row && e.is_bad_row() => {
                warn!("skipping bad row: {}", e);
                bad_rows += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok((written, bad_rows))
}
