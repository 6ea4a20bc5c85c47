use super::{BadRowPolicy, LoadError, LoadOptions, LoadResult};
use crate::TaskTable;
use crate::task::{
    DESCRIPTION_COLUMN, FINISH_COLUMN, PROGRESS_COLUMN, REQUIRED_COLUMNS, START_COLUMN,
    TASK_COLUMN, Task,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%m/%d/%Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Positions of the required columns within a header row.
struct ColumnIndex {
    task: usize,
    start: usize,
    finish: usize,
    progress: usize,
    description: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> LoadResult<Self> {
        let names: Vec<&str> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = if idx == 0 {
                    name.trim_start_matches('\u{feff}')
                } else {
                    name
                };
                name.trim()
            })
            .collect();

        let position = |column: &str| names.iter().position(|name| *name == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|column| position(**column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::Schema { missing });
        }

        let index = Self {
            task: position(TASK_COLUMN).unwrap_or_default(),
            start: position(START_COLUMN).unwrap_or_default(),
            finish: position(FINISH_COLUMN).unwrap_or_default(),
            progress: position(PROGRESS_COLUMN).unwrap_or_default(),
            description: position(DESCRIPTION_COLUMN).unwrap_or_default(),
        };
        debug!(
            task = index.task,
            start = index.start,
            finish = index.finish,
            progress = index.progress,
            description = index.description,
            ignored = names.len().saturating_sub(REQUIRED_COLUMNS.len()),
            "resolved csv header"
        );
        Ok(index)
    }

    fn record_to_task(&self, record: &csv::StringRecord, row: usize) -> LoadResult<Task> {
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let start = coerce(row, START_COLUMN, field(self.start), parse_date)?;
        let finish = coerce(row, FINISH_COLUMN, field(self.finish), parse_date)?;
        let progress = coerce(row, PROGRESS_COLUMN, field(self.progress), parse_progress)?;

        Ok(Task::new(
            field(self.task),
            start,
            finish,
            progress,
            field(self.description),
        ))
    }
}

fn coerce<T>(
    row: usize,
    column: &'static str,
    value: &str,
    parse: fn(&str) -> Result<T, String>,
) -> LoadResult<T> {
    parse(value).map_err(|reason| LoadError::ValueCoercion {
        row,
        column,
        value: value.to_string(),
        reason,
    })
}

/// Parses a calendar date, accepting the common unambiguous layouts.
///
/// Datetimes are accepted and truncated to their date.
pub fn parse_date(input: &str) -> Result<NaiveDate, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty date".to_string());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(datetime.date());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(input) {
        return Ok(datetime.date_naive());
    }

    Err("not a recognised date".to_string())
}

pub fn parse_progress(input: &str) -> Result<f64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("empty number".to_string());
    }
    let value = input.parse::<f64>().map_err(|e| e.to_string())?;
    if !value.is_finite() {
        return Err("number is not finite".to_string());
    }
    Ok(value)
}

pub fn load_tasks_from_csv<P: AsRef<Path>>(path: P) -> LoadResult<TaskTable> {
    load_tasks_from_csv_with(path, &LoadOptions::default())
}

pub fn load_tasks_from_csv_with<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> LoadResult<TaskTable> {
    let path = path.as_ref();
    // read everything up front so directories and unreadable files fail here
    let bytes = fs::read(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_tasks_from_reader(bytes.as_slice(), options)?;
    let span = table.date_span()?;
    info!(
        path = %path.display(),
        tasks = table.len(),
        first = ?span.map(|(first, _)| first),
        last = ?span.map(|(_, last)| last),
        mean_progress = ?table.mean_progress()?,
        "loaded tasks"
    );
    Ok(table)
}

pub fn load_tasks_from_reader<R: Read>(reader: R, options: &LoadOptions) -> LoadResult<TaskTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut tasks = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        match columns.record_to_task(&record, row) {
            Ok(task) => tasks.push(task),
            Err(err) if options.on_bad_row == BadRowPolicy::Skip => {
                warn!(row, error = %err, "skipping malformed row");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(TaskTable::from_tasks(tasks)?)
}
