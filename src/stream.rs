//! Cancellable streaming reads
//!
//! Each stream runs on its own background thread so the caller receives
//! the cancellation handle immediately. The driving task pushes records to
//! the observer one at a time, strictly in physical row order, and polls
//! the shared cancellation flag once per row. Cancellation is a hard stop:
//! a record already dispatched is delivered in full, but `on_complete` is
//! never called after a cancellation was observed.

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::mapper::{materialize_row, HeaderMode, HeaderSet};
use crate::projection::ColumnProjection;
use crate::sheet::WorkbookHandle;
use crate::types::Record;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Observer for a streaming read.
///
/// The driving task guarantees at most one terminal call (`on_complete` or
/// `on_error`) per stream, and none at all after cancellation.
pub trait StreamObserver: Send {
    /// One materialized record; called once per emitted row
    fn on_next(&mut self, record: Record);
    /// Natural exhaustion of the input; called exactly once, never after
    /// cancellation or an error
    fn on_complete(&mut self);
    /// Stream failure; called exactly once, instead of `on_complete`
    fn on_error(&mut self, error: ConnectorError);
}

/// Caller-held cancellation handle for one streaming read
#[derive(Debug, Clone)]
pub struct StreamHandle {
    cancelled: Arc<AtomicBool>,
}

impl StreamHandle {
    /// Request cooperative cancellation. Idempotent; the background task
    /// stops after at most the row currently in flight.
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            info!("stream cancellation requested");
        }
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

enum StreamEnd {
    Exhausted,
    Cancelled,
}

/// Start a background read pushing records to `observer`.
///
/// Returns the cancellation handle immediately; all resolution work
/// (source, sheet, headers) happens on the background task, so failures
/// there arrive through `on_error`, including an absent sheet.
pub fn start_stream(config: ConnectorConfig, mut observer: Box<dyn StreamObserver>) -> StreamHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let handle = StreamHandle {
        cancelled: Arc::clone(&cancelled),
    };

    thread::spawn(move || match drive(config, observer.as_mut(), &cancelled) {
        Ok(StreamEnd::Exhausted) => {
            info!("stream reader completed");
            observer.on_complete();
        }
        Ok(StreamEnd::Cancelled) => {
            info!("stream reader stopped after cancellation");
        }
        Err(err) => {
            error!(%err, "stream reader failed");
            observer.on_error(err);
        }
    });

    handle
}

fn drive(
    mut config: ConnectorConfig,
    observer: &mut dyn StreamObserver,
    cancelled: &AtomicBool,
) -> Result<StreamEnd> {
    let projection = ColumnProjection::resolve(config.columns.as_ref());
    let mode = HeaderMode::from_config(config.header_row, config.use_first_row_as_headers);
    let skip_empty = config.skip_empty_rows;
    let start_row = config.start_row;

    let mut workbook = WorkbookHandle::open(&mut config)?;
    let available = workbook.sheet_names().join(", ");
    let grid = workbook
        .select_sheet(config.sheet_name.as_deref(), config.sheet_index)?
        .ok_or_else(|| ConnectorError::SheetNotFound {
            sheet: sheet_label(&config),
            available,
        })?;

    let (headers, data_start) = HeaderSet::resolve(&grid, mode);
    let span = grid.row_span();
    let first_data_row = data_start.saturating_add(start_row as u32).min(span.end);

    for row in first_data_row..span.end {
        if cancelled.load(Ordering::SeqCst) {
            return Ok(StreamEnd::Cancelled);
        }
        if skip_empty && grid.is_row_empty(row) {
            continue;
        }
        observer.on_next(materialize_row(&grid, row, &headers, &projection));
    }

    if cancelled.load(Ordering::SeqCst) {
        return Ok(StreamEnd::Cancelled);
    }
    Ok(StreamEnd::Exhausted)
}

fn sheet_label(config: &ConnectorConfig) -> String {
    if let Some(name) = &config.sheet_name {
        name.clone()
    } else if let Some(index) = config.sheet_index {
        format!("index {index}")
    } else {
        "index 0".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let handle = StreamHandle {
            cancelled: Arc::new(AtomicBool::new(false)),
        };
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
