//! Incremental batch writing
//!
//! A writer session lazily creates the output sheet and header row from
//! the first non-empty batch, appends rows batch-by-batch, and finalizes
//! exactly once on close. The field list is fixed by the first batch's
//! first record; later batches are aligned to it regardless of their own
//! key sets (missing keys yield blank cells, extra keys are ignored).

use crate::config::{ConnectorConfig, OutputHandle};
use crate::error::{ConnectorError, Result};
use crate::projection::ColumnProjection;
use crate::types::{Record, Value};
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Batch-oriented writer session: lazy initialization from the first
/// batch, exactly-once finalization on close.
pub trait BatchWriter {
    /// Append one batch of records. The first non-empty batch fixes the
    /// field list for the whole session. Fails with
    /// [`ConnectorError::WriterClosed`] after `close`.
    fn write_batch(&mut self, records: &[Record]) -> Result<()>;

    /// Flush buffered rows to the destination and release the workbook.
    /// Idempotent; a second call is a no-op. The buffer is released even
    /// when the flush fails, and the flush error still propagates.
    fn close(&mut self) -> Result<()>;
}

/// Incremental Excel writer backed by the xlsx encoder.
///
/// The destination is resolved at close time: an already-open byte sink
/// wins over a file path. A caller-supplied sink is flushed but left for
/// the caller to manage; a file opened by the writer is the writer's own.
pub struct ExcelBatchWriter {
    workbook: Option<Workbook>,
    output_stream: Option<OutputHandle>,
    file_path: Option<PathBuf>,
    sheet_name: String,
    emit_header: bool,
    projection: ColumnProjection,
    fields: Option<Vec<String>>,
    date_format: Format,
    next_row: u32,
    closed: bool,
}

impl ExcelBatchWriter {
    /// Create a writer session from the connector configuration. The
    /// output sheet is not created until the first non-empty batch.
    pub fn new(mut config: ConnectorConfig) -> Self {
        ExcelBatchWriter {
            workbook: Some(Workbook::new()),
            output_stream: config.output_stream.take(),
            file_path: config.file_path.take(),
            sheet_name: config
                .sheet_name
                .take()
                .unwrap_or_else(|| "Sheet1".to_string()),
            emit_header: config.use_first_row_as_headers,
            projection: ColumnProjection::resolve(config.columns.as_ref()),
            fields: None,
            date_format: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            next_row: 0,
            closed: false,
        }
    }

    /// Fix the field list from the first record and emit the bold header
    /// row when header emission is enabled.
    fn initialize_sheet(&mut self, first: &Record) -> Result<()> {
        let workbook = self.workbook.as_mut().ok_or(ConnectorError::WriterClosed)?;
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(self.sheet_name.clone())?;

        let fields: Vec<String> = first.keys().cloned().collect();

        if self.emit_header {
            let header_format = Format::new().set_bold();
            let mut cell: u16 = 0;
            for (index, field) in fields.iter().enumerate() {
                if !self.projection.includes(index) {
                    continue;
                }
                worksheet.write_string_with_format(self.next_row, cell, field.as_str(), &header_format)?;
                cell += 1;
            }
            self.next_row += 1;
        }

        self.fields = Some(fields);
        Ok(())
    }

    fn append_record(&mut self, record: &Record) -> Result<()> {
        let workbook = self.workbook.as_mut().ok_or(ConnectorError::WriterClosed)?;
        let Some(fields) = self.fields.as_ref() else {
            return Ok(());
        };
        let worksheet = workbook.worksheet_from_index(0)?;
        let row = self.next_row;

        let mut cell: u16 = 0;
        for (index, field) in fields.iter().enumerate() {
            if !self.projection.includes(index) {
                continue;
            }
            match record.get(field).unwrap_or(&Value::Null) {
                // A null field writes no cell; blank and absent coerce
                // identically on read.
                Value::Null => {}
                Value::Int(i) => {
                    worksheet.write_number(row, cell, *i as f64)?;
                }
                Value::Float(f) => {
                    worksheet.write_number(row, cell, *f)?;
                }
                Value::Bool(b) => {
                    worksheet.write_boolean(row, cell, *b)?;
                }
                Value::DateTime(when) => {
                    worksheet.write_datetime_with_format(row, cell, when, &self.date_format)?;
                }
                other => {
                    worksheet.write_string(row, cell, other.as_string())?;
                }
            }
            cell += 1;
        }

        self.next_row += 1;
        Ok(())
    }

    /// Serialize the workbook to the resolved destination.
    fn flush_to_destination(&mut self) -> Result<()> {
        let Some(workbook) = self.workbook.as_mut() else {
            return Ok(());
        };
        // An xlsx workbook must contain at least one sheet even when no
        // batch was ever written.
        if self.fields.is_none() {
            workbook.add_worksheet().set_name(self.sheet_name.clone())?;
        }

        match (self.output_stream.take(), self.file_path.take()) {
            (Some(mut handle), _) => {
                let buffer = workbook.save_to_buffer()?;
                handle.write_all(&buffer)?;
                handle.flush()?;
            }
            (None, Some(path)) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        fs::create_dir_all(parent).map_err(|err| {
                            ConnectorError::WriteError(format!(
                                "failed to create parent directories for {}: {}",
                                path.display(),
                                err
                            ))
                        })?;
                    }
                }
                workbook.save(&path)?;
            }
            (None, None) => {
                return Err(ConnectorError::Configuration(
                    "either 'file_path' or 'output_stream' is required".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl BatchWriter for ExcelBatchWriter {
    fn write_batch(&mut self, records: &[Record]) -> Result<()> {
        if self.closed {
            return Err(ConnectorError::WriterClosed);
        }
        if records.is_empty() {
            return Ok(());
        }

        if self.fields.is_none() {
            self.initialize_sheet(&records[0])?;
        }

        for record in records {
            self.append_record(record)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let flushed = self.flush_to_destination();
        // Release the workbook buffer unconditionally; a flush failure
        // still propagates.
        self.workbook = None;
        flushed
    }
}

impl Drop for ExcelBatchWriter {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.close() {
                warn!(%err, "failed to finalize abandoned writer session");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConnectorConfig;

    fn record(fields: &[(&str, Value)]) -> Record {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut writer = ExcelBatchWriter::new(ConnectorConfig::for_output(Box::new(std::io::sink())));
        writer.close().unwrap();

        let batch = vec![record(&[("a", Value::Int(1))])];
        let result = writer.write_batch(&batch);
        assert!(matches!(result, Err(ConnectorError::WriterClosed)));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut writer = ExcelBatchWriter::new(ConnectorConfig::for_output(Box::new(std::io::sink())));
        writer.write_batch(&[record(&[("a", Value::Int(1))])]).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_close_without_destination_fails_but_releases() {
        let mut writer = ExcelBatchWriter::new(ConnectorConfig::default());
        let result = writer.close();
        assert!(matches!(result, Err(ConnectorError::Configuration(_))));
        // Second close is a no-op even after the failed flush.
        writer.close().unwrap();
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut writer = ExcelBatchWriter::new(ConnectorConfig::for_output(Box::new(std::io::sink())));
        writer.write_batch(&[]).unwrap();
        // No batch ever arrived, so no field list was fixed.
        writer.close().unwrap();
    }
}
