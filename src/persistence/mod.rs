use polars::prelude::PolarsError;
use std::fmt;
use std::io;
use std::path::PathBuf;

#[derive(Debug)]
pub enum LoadError {
    FileAccess {
        path: PathBuf,
        source: io::Error,
    },
    Schema {
        missing: Vec<String>,
    },
    ValueCoercion {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
    Csv(csv::Error),
    DataFrame(PolarsError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::FileAccess { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            LoadError::Schema { missing } => {
                write!(f, "missing required column(s): {}", missing.join(", "))
            }
            LoadError::ValueCoercion {
                row,
                column,
                value,
                reason,
            } => write!(
                f,
                "row {row}: cannot convert {column} value '{value}': {reason}"
            ),
            LoadError::Csv(err) => write!(f, "csv error: {err}"),
            LoadError::DataFrame(err) => write!(f, "dataframe conversion error: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::FileAccess { source, .. } => Some(source),
            LoadError::Csv(err) => Some(err),
            LoadError::DataFrame(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<PolarsError> for LoadError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

/// What to do with a data row whose dates or progress do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadRowPolicy {
    /// Fail the whole load on the first bad row.
    #[default]
    Abort,
    /// Drop the row, log a warning and keep going.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub on_bad_row: BadRowPolicy,
}

impl LoadOptions {
    pub fn skipping_bad_rows() -> Self {
        Self {
            on_bad_row: BadRowPolicy::Skip,
        }
    }
}

pub mod file;

pub use file::{
    load_tasks_from_csv, load_tasks_from_csv_with, load_tasks_from_reader, parse_date,
    parse_progress,
};
