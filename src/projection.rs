//! Column projection resolution
//!
//! A projection is a membership test over zero-based column indices. It
//! never reorders columns; column order is always governed by physical
//! position. Malformed configuration falls back to selecting all columns
//! rather than silently dropping data.

use crate::config::ColumnsSpec;
use std::collections::BTreeSet;
use tracing::warn;

/// Resolved set of columns allowed to pass into or out of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnProjection {
    /// All columns pass
    Unrestricted,
    /// Only the listed columns pass; the set is never empty
    Columns(BTreeSet<usize>),
}

impl ColumnProjection {
    /// Resolve a configured column selection.
    ///
    /// String form: comma-separated tokens, each a single non-negative
    /// integer or an inclusive `A-B` range. List form: every element parsed
    /// as an index. Duplicates are deduplicated. Absent, empty or
    /// unparseable input yields `Unrestricted`.
    pub fn resolve(spec: Option<&ColumnsSpec>) -> Self {
        let Some(spec) = spec else {
            return ColumnProjection::Unrestricted;
        };
        match try_parse(spec) {
            Ok(indices) if indices.is_empty() => ColumnProjection::Unrestricted,
            Ok(indices) => ColumnProjection::Columns(indices),
            Err(token) => {
                warn!(%token, "failed to parse 'columns' config, selecting all columns");
                ColumnProjection::Unrestricted
            }
        }
    }

    /// Membership test used during materialization
    pub fn includes(&self, column: usize) -> bool {
        match self {
            ColumnProjection::Unrestricted => true,
            ColumnProjection::Columns(set) => set.contains(&column),
        }
    }
}

fn try_parse(spec: &ColumnsSpec) -> Result<BTreeSet<usize>, String> {
    let mut indices = BTreeSet::new();
    match spec {
        ColumnsSpec::Pattern(pattern) => {
            for token in pattern.split(',') {
                let token = token.trim();
                if token.contains('-') {
                    let parts: Vec<&str> = token.split('-').collect();
                    if parts.len() != 2 {
                        return Err(token.to_string());
                    }
                    let start: usize =
                        parts[0].trim().parse().map_err(|_| token.to_string())?;
                    let end: usize = parts[1].trim().parse().map_err(|_| token.to_string())?;
                    if start > end {
                        return Err(token.to_string());
                    }
                    indices.extend(start..=end);
                } else {
                    let index: usize = token.parse().map_err(|_| token.to_string())?;
                    indices.insert(index);
                }
            }
        }
        ColumnsSpec::List(items) => {
            for item in items {
                let index = usize::try_from(*item).map_err(|_| item.to_string())?;
                indices.insert(index);
            }
        }
    }
    Ok(indices)
}
