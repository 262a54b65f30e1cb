//! Bulk workbook reading
//!
//! Opens the configured source, walks every data row through the mapping
//! engine and returns the complete record list in one outcome.

use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::mapper::{materialize_row, HeaderMode, HeaderSet};
use crate::projection::ColumnProjection;
use crate::sheet::WorkbookHandle;
use crate::types::{ConnectorOutcome, Record};
use std::time::Instant;

/// Read the configured sheet into a complete record list.
///
/// An absent sheet is reported as a failed outcome (`success == false`)
/// rather than an error so callers can branch without error handling; I/O
/// and decode failures are real errors.
pub fn read_records(mut config: ConnectorConfig) -> Result<ConnectorOutcome> {
    let started = Instant::now();

    let projection = ColumnProjection::resolve(config.columns.as_ref());
    let mode = HeaderMode::from_config(config.header_row, config.use_first_row_as_headers);
    let skip_empty = config.skip_empty_rows;
    let start_row = config.start_row;
    let limit = config.limit;

    let mut workbook = WorkbookHandle::open(&mut config)?;
    let Some(grid) = workbook.select_sheet(config.sheet_name.as_deref(), config.sheet_index)?
    else {
        return Ok(ConnectorOutcome::failed("Sheet not found"));
    };

    let (headers, data_start) = HeaderSet::resolve(&grid, mode);
    let span = grid.row_span();
    let first_data_row = data_start.saturating_add(start_row as u32).min(span.end);

    let mut records: Vec<Record> = Vec::new();
    for row in first_data_row..span.end {
        if limit.is_some_and(|max| records.len() as u64 >= max) {
            break;
        }
        if skip_empty && grid.is_row_empty(row) {
            continue;
        }
        records.push(materialize_row(&grid, row, &headers, &projection));
    }

    let message = format!(
        "Successfully read {} records from Excel workbook",
        records.len()
    );
    Ok(ConnectorOutcome::completed(message, records, started.elapsed()))
}
