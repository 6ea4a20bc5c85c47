use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;

pub const TASK_COLUMN: &str = "Task";
pub const START_COLUMN: &str = "Start";
pub const FINISH_COLUMN: &str = "Finish";
pub const PROGRESS_COLUMN: &str = "Progress";
pub const DESCRIPTION_COLUMN: &str = "Description";

/// Columns every task table carries, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    TASK_COLUMN,
    START_COLUMN,
    FINISH_COLUMN,
    PROGRESS_COLUMN,
    DESCRIPTION_COLUMN,
];

/// One row of the task table.
///
/// No invariants are enforced between fields: `finish` may precede `start` and
/// `progress` may fall outside `0..=100`. Both are carried to the chart as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub task: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub progress: f64,
    pub description: String,
}

impl Task {
    pub fn new(
        task: impl Into<String>,
        start: NaiveDate,
        finish: NaiveDate,
        progress: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            task: task.into(),
            start,
            finish,
            progress,
            description: description.into(),
        }
    }

    /// Length of the bar in whole days. Negative for inverted ranges.
    pub fn span_days(&self) -> i64 {
        (self.finish - self.start).num_days()
    }

    pub fn to_dataframe_row(&self) -> PolarsResult<DataFrame> {
        Self::columns_from_tasks(std::slice::from_ref(self))
    }

    pub fn from_dataframe_row(df: &DataFrame, row_idx: usize) -> PolarsResult<Self> {
        let task = df
            .column(TASK_COLUMN)?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        let start = Self::date_from_series(df.column(START_COLUMN)?.date()?, row_idx)
            .ok_or_else(|| {
                PolarsError::ComputeError(format!("row {row_idx} missing start date").into())
            })?;
        let finish = Self::date_from_series(df.column(FINISH_COLUMN)?.date()?, row_idx)
            .ok_or_else(|| {
                PolarsError::ComputeError(format!("row {row_idx} missing finish date").into())
            })?;

        let progress = df
            .column(PROGRESS_COLUMN)?
            .f64()?
            .get(row_idx)
            .ok_or_else(|| {
                PolarsError::ComputeError(format!("row {row_idx} missing progress").into())
            })?;

        let description = df
            .column(DESCRIPTION_COLUMN)?
            .str()?
            .get(row_idx)
            .unwrap_or("")
            .to_string();

        Ok(Self {
            task,
            start,
            finish,
            progress,
            description,
        })
    }

    /// Builds a frame with the task schema holding `tasks` in order.
    pub(crate) fn columns_from_tasks(tasks: &[Task]) -> PolarsResult<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(REQUIRED_COLUMNS.len());

        let labels: Vec<&str> = tasks.iter().map(|t| t.task.as_str()).collect();
        columns.push(Series::new(PlSmallStr::from_static(TASK_COLUMN), labels).into_column());

        let starts: Vec<NaiveDate> = tasks.iter().map(|t| t.start).collect();
        columns.push(Self::series_from_dates(START_COLUMN, &starts)?.into_column());

        let finishes: Vec<NaiveDate> = tasks.iter().map(|t| t.finish).collect();
        columns.push(Self::series_from_dates(FINISH_COLUMN, &finishes)?.into_column());

        let progress: Vec<f64> = tasks.iter().map(|t| t.progress).collect();
        columns.push(Series::new(PlSmallStr::from_static(PROGRESS_COLUMN), progress).into_column());

        let descriptions: Vec<&str> = tasks.iter().map(|t| t.description.as_str()).collect();
        columns.push(
            Series::new(PlSmallStr::from_static(DESCRIPTION_COLUMN), descriptions).into_column(),
        );

        DataFrame::new(columns)
    }

    fn series_from_dates(name: &'static str, dates: &[NaiveDate]) -> PolarsResult<Series> {
        let data: Vec<i32> = dates.iter().copied().map(Self::date_to_i32).collect();
        Series::new(PlSmallStr::from_static(name), data).cast(&DataType::Date)
    }

    fn date_from_series(chunked: &DateChunked, row_idx: usize) -> Option<NaiveDate> {
        chunked.get(row_idx).map(Self::date_from_i32)
    }

    fn date_to_i32(date: NaiveDate) -> i32 {
        (date - Self::epoch()).num_days() as i32
    }

    fn date_from_i32(days: i32) -> NaiveDate {
        Self::epoch() + Duration::days(days as i64)
    }

    fn epoch() -> NaiveDate {
        NaiveDate::default()
    }
}
