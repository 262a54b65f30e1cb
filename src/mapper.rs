//! Row-to-record mapping
//!
//! Combines header resolution with the column projection and the cell
//! coercer to turn one physical row into one ordered record. Bulk and
//! streaming reads both drive this engine, which is what guarantees exact
//! column-to-field alignment between independently-initiated operations.

use crate::projection::ColumnProjection;
use crate::sheet::SheetGrid;
use crate::types::Record;

/// How field names are derived for a sheet read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderMode {
    /// Field names come from the first occupied row
    FirstRow,
    /// Field names come from a fixed row index; rows up to and including
    /// it are excluded from data iteration
    Row(u32),
    /// No header row; every field name is synthesized
    None,
}

impl HeaderMode {
    pub fn from_config(header_row: Option<usize>, use_first_row_as_headers: bool) -> Self {
        match header_row {
            Some(row) => HeaderMode::Row(row as u32),
            None if use_first_row_as_headers => HeaderMode::FirstRow,
            None => HeaderMode::None,
        }
    }
}

/// Ordered field names for the columns under consideration.
///
/// Resolved once per sheet read; read-only thereafter.
#[derive(Debug, Clone)]
pub(crate) struct HeaderSet {
    names: Vec<String>,
}

impl HeaderSet {
    /// Resolve headers for a sheet. Returns the header set and the
    /// absolute row index where data begins.
    pub fn resolve(grid: &SheetGrid, mode: HeaderMode) -> (Self, u32) {
        let span = grid.row_span();
        match mode {
            HeaderMode::None => (HeaderSet { names: Vec::new() }, span.start),
            HeaderMode::FirstRow => {
                if span.is_empty() {
                    return (HeaderSet { names: Vec::new() }, span.start);
                }
                (Self::from_row(grid, span.start), span.start + 1)
            }
            HeaderMode::Row(row) => {
                if span.is_empty() || row >= span.end {
                    // Header row beyond the data: nothing left to iterate.
                    return (HeaderSet { names: Vec::new() }, span.end);
                }
                (Self::from_row(grid, row), (row + 1).max(span.start))
            }
        }
    }

    fn from_row(grid: &SheetGrid, row: u32) -> Self {
        let names = (0..grid.row_width(row))
            .map(|col| grid.cell_value(row, col).as_string())
            .collect();
        HeaderSet { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Field name for a column: the header entry, or a synthesized
    /// positional name once past the header's width (1-based over the
    /// overflow).
    pub fn field_name(&self, column: usize) -> String {
        match self.names.get(column) {
            Some(name) => name.clone(),
            None => format!("column_{}", column - self.names.len() + 1),
        }
    }
}

/// Turn one physical row into an ordered record.
///
/// Field insertion order follows physical column order; the projection is
/// a pure membership test and never reorders anything.
pub(crate) fn materialize_row(
    grid: &SheetGrid,
    row: u32,
    headers: &HeaderSet,
    projection: &ColumnProjection,
) -> Record {
    let mut record = Record::new();
    for col in 0..grid.row_width(row) {
        if !projection.includes(col) {
            continue;
        }
        record.insert(headers.field_name(col), grid.cell_value(row, col));
    }
    record
}
