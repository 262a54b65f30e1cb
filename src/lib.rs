//! # excelbridge
//!
//! A bidirectional connector between Excel workbooks and an ordered
//! key-value record model, built for generic data-integration frameworks.
//!
//! ## Features
//!
//! - **Bulk Read**: Load a whole sheet into ordered records with header
//!   inference, column projection, offset/limit windows and empty-row
//!   skipping
//! - **Streaming Read**: Push records to an observer one at a time from a
//!   background task, with cooperative cancellation
//! - **Incremental Write**: Batch-oriented writer sessions with lazy
//!   header initialization and exactly-once finalization
//! - **Typed Values**: Cells coerce to null, string, boolean, integer,
//!   float or date/time, with integral doubles narrowed to integers
//! - **Multiple Formats**: Reads XLSX, XLS and ODS; writes XLSX
//!
//! ## Quick Start
//!
//! ### Bulk reading
//!
//! ```rust,no_run
//! use excelbridge::{BulkSource, ConnectorConfig, ExcelConnector};
//!
//! # fn main() -> excelbridge::Result<()> {
//! let connector = ExcelConnector::new();
//! let outcome = connector.read(ConnectorConfig::for_path("data.xlsx"))?;
//!
//! for record in &outcome.records {
//!     println!("{record:?}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Incremental writing
//!
//! ```rust,no_run
//! use excelbridge::{BatchWriter, ConnectorConfig, ExcelBatchWriter, Record, Value};
//!
//! # fn main() -> excelbridge::Result<()> {
//! let mut writer = ExcelBatchWriter::new(ConnectorConfig::for_path("output.xlsx"));
//!
//! let mut record = Record::new();
//! record.insert("id".to_string(), Value::Int(1));
//! record.insert("name".to_string(), Value::from("Alice"));
//!
//! writer.write_batch(&[record])?;
//! writer.close()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod projection;
pub mod reader;
pub mod stream;
pub mod types;
pub mod writer;

mod mapper;
mod sheet;

pub use config::{ColumnsSpec, ConnectorConfig, InputHandle, OutputHandle};
pub use connector::{BulkSink, BulkSource, Connector, ExcelConnector, StreamSink, StreamSource};
pub use error::{ConnectorError, Result};
pub use projection::ColumnProjection;
pub use stream::{StreamHandle, StreamObserver};
pub use types::{ConnectorMetadata, ConnectorOutcome, Record, Value};
pub use writer::{BatchWriter, ExcelBatchWriter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_imports() {
        // Test that all public types are accessible
        let _ = std::marker::PhantomData::<ConnectorError>;
        let _ = std::marker::PhantomData::<ExcelConnector>;
        let _ = std::marker::PhantomData::<ExcelBatchWriter>;
    }
}
