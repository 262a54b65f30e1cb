//! Error types for excelbridge operations

use thiserror::Error;

/// Result type alias for excelbridge operations
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Main error type for all connector operations
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Configuration is missing or inconsistent; reported before any I/O
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// No readable input could be resolved from the configuration
    #[error("Input not found: {0}")]
    InputNotFound(String),

    /// Error occurred while decoding a workbook
    #[error("Failed to read Excel workbook: {0}")]
    ReadError(String),

    /// Error occurred while encoding a workbook
    #[error("Failed to write Excel workbook: {0}")]
    WriteError(String),

    /// Named or indexed sheet is absent from the workbook
    #[error("Sheet '{sheet}' not found. Available sheets: {available}")]
    SheetNotFound { sheet: String, available: String },

    /// A batch was submitted to a writer session that was already finalized
    #[error("Writer is already closed")]
    WriterClosed,

    /// IO error wrapper
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Capability not implemented by this connector
    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

impl From<calamine::Error> for ConnectorError {
    fn from(err: calamine::Error) -> Self {
        ConnectorError::ReadError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ConnectorError {
    fn from(err: calamine::XlsxError) -> Self {
        ConnectorError::ReadError(err.to_string())
    }
}

impl From<calamine::XlsError> for ConnectorError {
    fn from(err: calamine::XlsError) -> Self {
        ConnectorError::ReadError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ConnectorError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ConnectorError::WriteError(err.to_string())
    }
}
