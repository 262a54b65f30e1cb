//! Workbook codec boundary
//!
//! Wraps the calamine decoder behind the small surface the mapping engine
//! needs: source resolution, sheet selection and per-cell coercion into
//! connector [`Value`]s. The physical xlsx/xls/ods encoding is owned by
//! the codec; nothing above this module touches it.

use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, Result};
use crate::types::Value;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use tracing::info;

/// An open workbook, backed either by a file on disk or by a fully
/// buffered caller-supplied byte stream.
pub(crate) enum WorkbookHandle {
    File(Sheets<BufReader<File>>),
    Memory(Sheets<Cursor<Vec<u8>>>),
}

impl WorkbookHandle {
    /// Resolve the configured source and open it.
    ///
    /// Priority: `file_path` as a filesystem path, then `file_path` under
    /// `resource_dir`, then a caller-supplied `input_stream` (consumed from
    /// the config). No match is an error, not a structured outcome.
    pub fn open(config: &mut ConnectorConfig) -> Result<Self> {
        if let Some(path) = &config.file_path {
            if path.exists() {
                return Ok(WorkbookHandle::File(open_workbook_auto(path)?));
            }
            if let Some(root) = &config.resource_dir {
                let bundled = root.join(path);
                if bundled.exists() {
                    info!(path = %bundled.display(), "reading workbook from bundled resource");
                    return Ok(WorkbookHandle::File(open_workbook_auto(bundled)?));
                }
            }
        }

        if let Some(mut input) = config.input_stream.take() {
            // The decoder needs random access, so a plain byte stream is
            // buffered in full before opening.
            let mut buffer = Vec::new();
            input.read_to_end(&mut buffer)?;
            let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
            return Ok(WorkbookHandle::Memory(workbook));
        }

        match &config.file_path {
            Some(path) => Err(ConnectorError::InputNotFound(path.display().to_string())),
            None => Err(ConnectorError::Configuration(
                "either 'file_path' or 'input_stream' is required".to_string(),
            )),
        }
    }

    /// Names of all sheets in the workbook, in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        match self {
            WorkbookHandle::File(workbook) => workbook.sheet_names().to_vec(),
            WorkbookHandle::Memory(workbook) => workbook.sheet_names().to_vec(),
        }
    }

    /// Select the configured sheet: by name, else by index, else the first
    /// sheet. `Ok(None)` means the sheet does not exist; callers decide
    /// whether that is a structured failure or an observer error.
    pub fn select_sheet(
        &mut self,
        sheet_name: Option<&str>,
        sheet_index: Option<usize>,
    ) -> Result<Option<SheetGrid>> {
        let names = self.sheet_names();
        let resolved = match (sheet_name, sheet_index) {
            (Some(name), _) => names.iter().find(|n| n.as_str() == name).cloned(),
            (None, Some(index)) => names.get(index).cloned(),
            (None, None) => names.first().cloned(),
        };
        let Some(name) = resolved else {
            return Ok(None);
        };

        let values = self.range_by_name(&name)?;
        let formulas = self.formula_by_name(&name);
        Ok(Some(SheetGrid { values, formulas }))
    }

    fn range_by_name(&mut self, name: &str) -> Result<Range<Data>> {
        let range = match self {
            WorkbookHandle::File(workbook) => workbook.worksheet_range(name),
            WorkbookHandle::Memory(workbook) => workbook.worksheet_range(name),
        }?;
        Ok(range)
    }

    /// Formula text range for a sheet. Formats without formula support
    /// degrade to values only.
    fn formula_by_name(&mut self, name: &str) -> Option<Range<String>> {
        let range = match self {
            WorkbookHandle::File(workbook) => workbook.worksheet_formula(name),
            WorkbookHandle::Memory(workbook) => workbook.worksheet_formula(name),
        }
        .ok()?;
        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }
}

/// One sheet's decoded cell grid.
///
/// Combines the value range with the formula range so formula cells
/// surface their literal text instead of the cached result. All column
/// indices are absolute physical positions, starting at zero.
pub(crate) struct SheetGrid {
    values: Range<Data>,
    formulas: Option<Range<String>>,
}

impl SheetGrid {
    #[cfg(test)]
    pub fn new(values: Range<Data>, formulas: Option<Range<String>>) -> Self {
        SheetGrid { values, formulas }
    }

    /// Absolute row indices of the occupied range; start inclusive, end
    /// exclusive.
    pub fn row_span(&self) -> std::ops::Range<u32> {
        match (self.values.start(), self.values.end()) {
            (Some((first, _)), Some((last, _))) => first..last + 1,
            _ => 0..0,
        }
    }

    /// Physical columns considered per sheet: column 0 through the last
    /// occupied column.
    pub fn column_count(&self) -> usize {
        match self.values.end() {
            Some((_, last)) => last as usize + 1,
            None => 0,
        }
    }

    /// Width of one physical row: last occupied column index + 1
    pub fn row_width(&self, row: u32) -> usize {
        (0..self.column_count())
            .rev()
            .find(|&col| !matches!(self.data(row, col), None | Some(Data::Empty)))
            .map(|col| col + 1)
            .unwrap_or(0)
    }

    /// A row is structurally empty when every cell in its span is absent
    /// or blank. Checked before projection.
    pub fn is_row_empty(&self, row: u32) -> bool {
        (0..self.column_count()).all(|col| matches!(self.data(row, col), None | Some(Data::Empty)))
    }

    /// Coerce one cell to a connector value.
    ///
    /// Blank-as-null semantics: a structurally absent cell and an explicit
    /// blank both yield `Null`. Formula cells yield their literal formula
    /// text; evaluation is not performed. Unrepresentable cell kinds yield
    /// the empty string, the historical compatibility fallback.
    pub fn cell_value(&self, row: u32, col: usize) -> Value {
        if let Some(formula) = self.formula(row, col) {
            return Value::String(formula.to_string());
        }

        match self.data(row, col) {
            None | Some(Data::Empty) => Value::Null,
            Some(Data::String(s)) => Value::String(s.clone()),
            Some(Data::Bool(b)) => Value::Bool(*b),
            Some(Data::Int(i)) => Value::Int(*i),
            Some(Data::Float(f)) => narrow_numeric(*f),
            Some(Data::DateTime(dt)) => match dt.as_datetime() {
                Some(when) => Value::DateTime(when),
                None => narrow_numeric(dt.as_f64()),
            },
            Some(Data::DateTimeIso(s)) => match s.parse::<NaiveDateTime>() {
                Ok(when) => Value::DateTime(when),
                Err(_) => Value::String(s.clone()),
            },
            Some(_) => Value::String(String::new()),
        }
    }

    fn data(&self, row: u32, col: usize) -> Option<&Data> {
        self.values.get_value((row, col as u32))
    }

    fn formula(&self, row: u32, col: usize) -> Option<&str> {
        let text = self.formulas.as_ref()?.get_value((row, col as u32))?;
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Spreadsheet numerics are stored as doubles; integral values narrow to
/// `Int` so they round-trip as integers rather than `3.0`.
fn narrow_numeric(value: f64) -> Value {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Value::Int(value as i64)
    } else {
        Value::Float(value)
    }
}
