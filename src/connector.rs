//! Connector capability surface
//!
//! One trait per capability; a concrete connector implements the subset
//! it supports and the framework discovers the rest through
//! [`ConnectorError::NotSupported`](crate::error::ConnectorError) rather
//! than a crash.

use crate::config::ConnectorConfig;
use crate::error::Result;
use crate::reader::read_records;
use crate::stream::{start_stream, StreamHandle, StreamObserver};
use crate::types::{ConnectorMetadata, ConnectorOutcome, Record};
use crate::writer::{BatchWriter, ExcelBatchWriter};
use std::time::Instant;

/// Base contract every connector carries: identity, metadata and
/// configuration validation.
pub trait Connector {
    /// Short type tag the framework registers the connector under
    fn kind(&self) -> &'static str;

    /// Descriptive metadata
    fn metadata(&self) -> ConnectorMetadata;

    /// Human-readable configuration errors, reported before any I/O is
    /// attempted. An empty list means the configuration is acceptable.
    fn validate(&self, config: &ConnectorConfig) -> Vec<String>;
}

/// Bulk load-everything read capability
pub trait BulkSource: Connector {
    fn read(&self, config: ConnectorConfig) -> Result<ConnectorOutcome>;
}

/// Bulk write capability
pub trait BulkSink: Connector {
    fn write(&self, config: ConnectorConfig, records: Vec<Record>) -> Result<ConnectorOutcome>;
}

/// Incremental, cancellable streaming-read capability
pub trait StreamSource: Connector {
    fn start_stream(
        &self,
        config: ConnectorConfig,
        observer: Box<dyn StreamObserver>,
    ) -> Result<StreamHandle>;
}

/// Incremental batch-write capability
pub trait StreamSink: Connector {
    fn create_writer(&self, config: ConnectorConfig) -> Result<Box<dyn BatchWriter>>;
}

/// Excel connector: reads and writes workbooks as ordered records
#[derive(Debug, Default, Clone, Copy)]
pub struct ExcelConnector;

impl ExcelConnector {
    pub fn new() -> Self {
        ExcelConnector
    }
}

impl Connector for ExcelConnector {
    fn kind(&self) -> &'static str {
        "excel"
    }

    fn metadata(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            name: "Excel Connector",
            description: "Reads and writes Excel workbooks as ordered key-value records",
            version: env!("CARGO_PKG_VERSION"),
            author: "excelbridge contributors",
        }
    }

    fn validate(&self, config: &ConnectorConfig) -> Vec<String> {
        let mut errors = Vec::new();
        match config.supplied_endpoints() {
            0 => errors.push(
                "Missing source/destination: either 'file_path', 'input_stream' or \
                 'output_stream' is required"
                    .to_string(),
            ),
            1 => {}
            _ => errors.push(
                "Ambiguous source/destination: supply exactly one of 'file_path', \
                 'input_stream' or 'output_stream'"
                    .to_string(),
            ),
        }
        errors
    }
}

impl BulkSource for ExcelConnector {
    fn read(&self, config: ConnectorConfig) -> Result<ConnectorOutcome> {
        read_records(config)
    }
}

impl BulkSink for ExcelConnector {
    fn write(&self, config: ConnectorConfig, records: Vec<Record>) -> Result<ConnectorOutcome> {
        let started = Instant::now();

        if records.is_empty() {
            return Ok(ConnectorOutcome::completed(
                "No data to write",
                records,
                started.elapsed(),
            ));
        }

        let mut writer = ExcelBatchWriter::new(config);
        writer.write_batch(&records)?;
        writer.close()?;

        let message = format!("Successfully wrote {} records to Excel workbook", records.len());
        Ok(ConnectorOutcome::completed(message, records, started.elapsed()))
    }
}

impl StreamSource for ExcelConnector {
    fn start_stream(
        &self,
        config: ConnectorConfig,
        observer: Box<dyn StreamObserver>,
    ) -> Result<StreamHandle> {
        Ok(start_stream(config, observer))
    }
}

impl StreamSink for ExcelConnector {
    fn create_writer(&self, config: ConnectorConfig) -> Result<Box<dyn BatchWriter>> {
        Ok(Box::new(ExcelBatchWriter::new(config)))
    }
}
