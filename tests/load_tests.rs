use chrono::NaiveDate;
use gantt_tool::{LoadError, LoadOptions, Task, load_tasks_from_csv, load_tasks_from_csv_with};
use polars::prelude::DataType;
use std::io::Write;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_every_row_with_typed_columns() {
    let table = load_tasks_from_csv(fixture("sample_tasks.csv")).unwrap();
    assert_eq!(table.len(), 4);

    let df = table.dataframe();
    assert_eq!(df.column("Start").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("Finish").unwrap().dtype(), &DataType::Date);
    assert_eq!(df.column("Progress").unwrap().dtype(), &DataType::Float64);
    assert!(df.column("Owner").is_err(), "extra columns are dropped");

    let tasks = table.tasks().unwrap();
    let labels: Vec<&str> = tasks.iter().map(|t| t.task.as_str()).collect();
    assert_eq!(labels, vec!["Research", "Design", "Build", "Test"]);
    assert_eq!(tasks[2].start, d(2024, 1, 9));
    assert_eq!(tasks[2].finish, d(2024, 2, 2));
}

#[test]
fn text_and_progress_read_back_unchanged() {
    let file = csv_file(
        "Task,Start,Finish,Progress,Description\n\
         Ünïcode task,2024-01-01,2024-01-02,12.75,\"Quoted, with comma\"\n\
         Plain,2024-01-03,2024-01-04,0,\n",
    );
    let tasks = load_tasks_from_csv(file.path()).unwrap().tasks().unwrap();
    assert_eq!(tasks[0].task, "Ünïcode task");
    assert_eq!(tasks[0].progress, 12.75);
    assert_eq!(tasks[0].description, "Quoted, with comma");
    assert_eq!(tasks[1].progress, 0.0);
    assert_eq!(tasks[1].description, "");
}

#[test]
fn columns_may_appear_in_any_order() {
    let file = csv_file(
        "Description,Progress,Finish,Task,Start\n\
         Draft layout,50,2024-01-08,Design,2024-01-01\n",
    );
    let table = load_tasks_from_csv(file.path()).unwrap();
    assert_eq!(
        table.task(0).unwrap(),
        Task::new("Design", d(2024, 1, 1), d(2024, 1, 8), 50.0, "Draft layout")
    );
}

#[test]
fn header_only_file_gives_empty_table() {
    let table = load_tasks_from_csv(fixture("header_only.csv")).unwrap();
    assert!(table.is_empty());
    assert_eq!(table.dataframe().width(), 5);
}

#[test]
fn missing_finish_column_is_a_schema_error() {
    let file = csv_file("Task,Start,Progress,Description\nA,2024-01-01,10,x\n");
    match load_tasks_from_csv(file.path()) {
        Err(LoadError::Schema { missing }) => assert_eq!(missing, vec!["Finish"]),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn empty_file_is_a_schema_error() {
    let file = csv_file("");
    assert!(matches!(
        load_tasks_from_csv(file.path()),
        Err(LoadError::Schema { missing }) if missing.len() == 5
    ));
}

#[test]
fn nonexistent_path_is_a_file_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");
    match load_tasks_from_csv(&path) {
        Err(LoadError::FileAccess { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected file access error, got {other:?}"),
    }
}

#[test]
fn directory_path_is_a_file_access_error() {
    let dir = tempfile::tempdir().unwrap();
    match load_tasks_from_csv(dir.path()) {
        Err(LoadError::FileAccess { path, .. }) => assert_eq!(path, dir.path()),
        other => panic!("expected file access error, got {other:?}"),
    }
}

#[test]
fn bad_value_aborts_whole_load_by_default() {
    let file = csv_file(
        "Task,Start,Finish,Progress,Description\n\
         Good,2024-01-01,2024-01-02,10,x\n\
         Bad,2024-01-03,someday,10,x\n",
    );
    match load_tasks_from_csv(file.path()) {
        Err(LoadError::ValueCoercion {
            row, column, value, ..
        }) => {
            assert_eq!(row, 2);
            assert_eq!(column, "Finish");
            assert_eq!(value, "someday");
        }
        other => panic!("expected coercion error, got {other:?}"),
    }
}

#[test]
fn non_numeric_progress_is_a_coercion_error() {
    let file = csv_file("Task,Start,Finish,Progress,Description\nA,2024-01-01,2024-01-02,half,x\n");
    let err = load_tasks_from_csv(file.path()).unwrap_err();
    assert!(matches!(
        err,
        LoadError::ValueCoercion { column: "Progress", .. }
    ));
    assert!(err.to_string().contains("row 1"), "message: {err}");
}

#[test]
fn skip_policy_drops_bad_rows_and_keeps_order() {
    let file = csv_file(
        "Task,Start,Finish,Progress,Description\n\
         First,2024-01-01,2024-01-02,10,x\n\
         Broken,not-a-date,2024-01-02,10,x\n\
         Third,2024-01-05,2024-01-06,n/a,x\n\
         Fourth,2024-01-07,2024-01-09,90,x\n",
    );
    let table = load_tasks_from_csv_with(file.path(), &LoadOptions::skipping_bad_rows()).unwrap();
    let labels: Vec<String> = table.tasks().unwrap().into_iter().map(|t| t.task).collect();
    assert_eq!(labels, vec!["First", "Fourth"]);
}

#[test]
fn inverted_ranges_and_out_of_range_progress_pass_through() {
    let file = csv_file(
        "Task,Start,Finish,Progress,Description\n\
         Backwards,2024-03-10,2024-03-01,150,x\n\
         Negative,2024-03-01,2024-03-02,-20,y\n",
    );
    let tasks = load_tasks_from_csv(file.path()).unwrap().tasks().unwrap();
    assert_eq!(tasks[0].start, d(2024, 3, 10));
    assert_eq!(tasks[0].finish, d(2024, 3, 1));
    assert_eq!(tasks[0].progress, 150.0);
    assert_eq!(tasks[1].progress, -20.0);
}

#[test]
fn permissive_dates_are_accepted() {
    let file = csv_file(
        "Task,Start,Finish,Progress,Description\n\
         A,2024/01/01,\"Jan 08, 2024\",5,x\n\
         B,2024-01-09T08:00:00,09 Feb 2024,5,y\n",
    );
    let tasks = load_tasks_from_csv(file.path()).unwrap().tasks().unwrap();
    assert_eq!((tasks[0].start, tasks[0].finish), (d(2024, 1, 1), d(2024, 1, 8)));
    assert_eq!((tasks[1].start, tasks[1].finish), (d(2024, 1, 9), d(2024, 2, 9)));
}
