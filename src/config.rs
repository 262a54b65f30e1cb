//! Connector configuration
//!
//! All keys are optional except that at least one of `file_path`,
//! `input_stream` or `output_stream` must be present; that check runs
//! before any I/O is attempted.

use std::fmt;
use std::io::{Read, Write};
use std::path::PathBuf;

/// Caller-supplied byte source for reading a workbook
pub type InputHandle = Box<dyn Read + Send>;

/// Caller-supplied byte sink for writing a workbook
pub type OutputHandle = Box<dyn Write + Send>;

/// Column selection as supplied by the framework configuration: either a
/// comma-separated index/range string (`"0,2-5,7"`) or a list of indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnsSpec {
    Pattern(String),
    List(Vec<i64>),
}

impl From<&str> for ColumnsSpec {
    fn from(s: &str) -> Self {
        ColumnsSpec::Pattern(s.to_string())
    }
}

impl From<String> for ColumnsSpec {
    fn from(s: String) -> Self {
        ColumnsSpec::Pattern(s)
    }
}

impl From<Vec<i64>> for ColumnsSpec {
    fn from(items: Vec<i64>) -> Self {
        ColumnsSpec::List(items)
    }
}

/// Configuration for one connector operation.
///
/// Byte handles are consumed by the operation that uses them, so a config
/// is moved into each read, stream or writer session.
pub struct ConnectorConfig {
    /// Path of the workbook to read or write
    pub file_path: Option<PathBuf>,
    /// Root directory for bundled-resource lookups when `file_path` does
    /// not exist as given (read path only)
    pub resource_dir: Option<PathBuf>,
    /// Already-open byte source, alternative to `file_path` for reads
    pub input_stream: Option<InputHandle>,
    /// Already-open byte sink, alternative to `file_path` for writes
    pub output_stream: Option<OutputHandle>,
    /// Sheet selected by name; wins over `sheet_index`
    pub sheet_name: Option<String>,
    /// Sheet selected by zero-based index; defaults to the first sheet
    pub sheet_index: Option<usize>,
    /// Data rows to skip after the header row
    pub start_row: usize,
    /// Fixed header row index (simplified variant). Takes precedence over
    /// `use_first_row_as_headers` when set.
    pub header_row: Option<usize>,
    /// Maximum record count; `None` is unbounded
    pub limit: Option<u64>,
    /// Column projection; absent means all columns
    pub columns: Option<ColumnsSpec>,
    /// Drop structurally empty rows while reading
    pub skip_empty_rows: bool,
    /// Read field names from the first row / emit a header row when writing
    pub use_first_row_as_headers: bool,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig {
            file_path: None,
            resource_dir: None,
            input_stream: None,
            output_stream: None,
            sheet_name: None,
            sheet_index: None,
            start_row: 0,
            header_row: None,
            limit: None,
            columns: None,
            skip_empty_rows: true,
            use_first_row_as_headers: true,
        }
    }
}

impl ConnectorConfig {
    /// Configuration reading from or writing to a file path
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        ConnectorConfig {
            file_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Configuration reading from an already-open byte source
    pub fn for_input(handle: InputHandle) -> Self {
        ConnectorConfig {
            input_stream: Some(handle),
            ..Default::default()
        }
    }

    /// Configuration writing to an already-open byte sink
    pub fn for_output(handle: OutputHandle) -> Self {
        ConnectorConfig {
            output_stream: Some(handle),
            ..Default::default()
        }
    }

    /// Normalize a framework-style limit where a negative value means
    /// unbounded.
    pub fn limit_from_i64(limit: i64) -> Option<u64> {
        u64::try_from(limit).ok()
    }

    /// Number of supplied endpoints among `file_path`, `input_stream` and
    /// `output_stream`. Valid configurations supply exactly one.
    pub(crate) fn supplied_endpoints(&self) -> usize {
        [
            self.file_path.is_some(),
            self.input_stream.is_some(),
            self.output_stream.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }
}

impl fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("file_path", &self.file_path)
            .field("resource_dir", &self.resource_dir)
            .field("input_stream", &self.input_stream.is_some())
            .field("output_stream", &self.output_stream.is_some())
            .field("sheet_name", &self.sheet_name)
            .field("sheet_index", &self.sheet_index)
            .field("start_row", &self.start_row)
            .field("header_row", &self.header_row)
            .field("limit", &self.limit)
            .field("columns", &self.columns)
            .field("skip_empty_rows", &self.skip_empty_rows)
            .field("use_first_row_as_headers", &self.use_first_row_as_headers)
            .finish()
    }
}
