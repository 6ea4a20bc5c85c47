use crate::chart::GanttChart;
use crate::config::ChartConfig;
use crate::persistence::{LoadError, LoadOptions, load_tasks_from_csv_with};
use crate::render::{ChartSink, RenderError};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

pub const PROMPT: &str = "Enter the path to the CSV file: ";
pub const NO_TASKS_MESSAGE: &str = "No tasks to display.";

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    NoInput,
    Load(LoadError),
    Render(RenderError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(err) => write!(f, "io error: {err}"),
            SessionError::NoInput => write!(f, "no file path given"),
            SessionError::Load(err) => write!(f, "{err}"),
            SessionError::Render(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<LoadError> for SessionError {
    fn from(value: LoadError) -> Self {
        Self::Load(value)
    }
}

impl From<RenderError> for SessionError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Rendered { tasks: usize },
    Empty,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Skips the prompt when set.
    pub path: Option<PathBuf>,
    pub load: LoadOptions,
    pub chart: ChartConfig,
}

/// Strips whitespace and one pair of matching surrounding quotes.
pub fn clean_path_input(raw: &str) -> &str {
    let trimmed = raw.trim();
    for quote in ['"', '\''] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return trimmed[1..trimmed.len() - 1].trim();
        }
    }
    trimmed
}

fn prompt_for_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> SessionResult<PathBuf> {
    write!(output, "{PROMPT}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SessionError::NoInput);
    }
    let path = clean_path_input(&line);
    if path.is_empty() {
        return Err(SessionError::NoInput);
    }
    Ok(PathBuf::from(path))
}

/// Asks for a CSV path, loads it and shows the chart through `sink`.
///
/// An empty table prints [`NO_TASKS_MESSAGE`] and never reaches the sink.
pub fn run_session<R, W, S>(
    mut input: R,
    mut output: W,
    sink: &S,
    options: &SessionOptions,
) -> SessionResult<SessionOutcome>
where
    R: BufRead,
    W: Write,
    S: ChartSink + ?Sized,
{
    let path = match &options.path {
        Some(path) => path.clone(),
        None => prompt_for_path(&mut input, &mut output)?,
    };

    let table = load_tasks_from_csv_with(&path, &options.load)?;
    writeln!(output, "File path: {}", path.display())?;

    if table.is_empty() {
        writeln!(output, "{NO_TASKS_MESSAGE}")?;
        return Ok(SessionOutcome::Empty);
    }

    let chart = GanttChart::from_table(&table, &options.chart)?;
    sink.present(&chart)?;
    Ok(SessionOutcome::Rendered { tasks: table.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_strips_quotes_and_whitespace() {
        assert_eq!(clean_path_input("  tasks.csv\n"), "tasks.csv");
        assert_eq!(clean_path_input("\"/tmp/my tasks.csv\"\n"), "/tmp/my tasks.csv");
        assert_eq!(clean_path_input("'a.csv'"), "a.csv");
        assert_eq!(clean_path_input("\"a.csv'"), "\"a.csv'");
        assert_eq!(clean_path_input("\""), "\"");
    }
}
