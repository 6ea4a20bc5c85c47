use crate::task::{
    DESCRIPTION_COLUMN, FINISH_COLUMN, PROGRESS_COLUMN, START_COLUMN, TASK_COLUMN, Task,
};
use chrono::NaiveDate;
use polars::prelude::*;

/// Loaded tasks, in input order, backed by a polars frame.
#[derive(Debug, Clone)]
pub struct TaskTable {
    df: DataFrame,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskTable {
    pub fn new() -> Self {
        let schema = Self::default_schema();
        Self {
            df: DataFrame::empty_with_schema(&schema),
        }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> PolarsResult<Self> {
        if tasks.is_empty() {
            return Ok(Self::new());
        }
        let df = Task::columns_from_tasks(&tasks)?;
        Ok(Self { df })
    }

    pub(crate) fn default_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new(TASK_COLUMN.into(), DataType::String),
            Field::new(START_COLUMN.into(), DataType::Date),
            Field::new(FINISH_COLUMN.into(), DataType::Date),
            Field::new(PROGRESS_COLUMN.into(), DataType::Float64),
            Field::new(DESCRIPTION_COLUMN.into(), DataType::String),
        ])
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn task(&self, row_idx: usize) -> PolarsResult<Task> {
        if row_idx >= self.len() {
            return Err(PolarsError::OutOfBounds(
                format!("row {row_idx} out of bounds for {} tasks", self.len()).into(),
            ));
        }
        Task::from_dataframe_row(&self.df, row_idx)
    }

    pub fn tasks(&self) -> PolarsResult<Vec<Task>> {
        let mut tasks = Vec::with_capacity(self.len());
        for row_idx in 0..self.len() {
            tasks.push(Task::from_dataframe_row(&self.df, row_idx)?);
        }
        Ok(tasks)
    }

    /// Earliest and latest date found in either date column.
    pub fn date_span(&self) -> PolarsResult<Option<(NaiveDate, NaiveDate)>> {
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for task in self.tasks()? {
            let lo = task.start.min(task.finish);
            let hi = task.start.max(task.finish);
            span = Some(match span {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        Ok(span)
    }

    pub fn mean_progress(&self) -> PolarsResult<Option<f64>> {
        Ok(self.df.column(PROGRESS_COLUMN)?.f64()?.mean())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("Design", d(2024, 1, 1), d(2024, 1, 8), 50.0, "Draft layout"),
            Task::new("Build", d(2024, 1, 9), d(2024, 2, 1), 10.0, "Implement"),
            Task::new("Design", d(2024, 2, 5), d(2024, 2, 2), 0.0, "Review"),
        ]
    }

    #[test]
    fn default_schema_contains_expected_columns() {
        let table = TaskTable::new();
        let names: Vec<String> = table
            .dataframe()
            .get_column_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Task", "Start", "Finish", "Progress", "Description"]
        );
        assert!(table.is_empty());
        assert_eq!(table.date_span().unwrap(), None);
        assert_eq!(table.mean_progress().unwrap(), None);
    }

    #[test]
    fn from_tasks_preserves_order_and_duplicates() {
        let tasks = sample();
        let table = TaskTable::from_tasks(tasks.clone()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.tasks().unwrap(), tasks);
        assert_eq!(table.task(2).unwrap().description, "Review");
    }

    #[test]
    fn task_out_of_bounds_is_an_error() {
        let table = TaskTable::from_tasks(sample()).unwrap();
        assert!(table.task(3).is_err());
    }

    #[test]
    fn date_span_covers_inverted_ranges() {
        let table = TaskTable::from_tasks(sample()).unwrap();
        assert_eq!(
            table.date_span().unwrap(),
            Some((d(2024, 1, 1), d(2024, 2, 5)))
        );
    }

    #[test]
    fn mean_progress_averages_all_rows() {
        let table = TaskTable::from_tasks(sample()).unwrap();
        let mean = table.mean_progress().unwrap().unwrap();
        assert!((mean - 20.0).abs() < 1e-9);
    }
}
