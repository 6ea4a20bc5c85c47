use crate::chart::GanttChart;
use crate::config::ConfigError;
use polars::prelude::PolarsError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
pub const OUTPUT_FILE_NAME: &str = "gantt_chart.html";

#[derive(Debug)]
pub enum RenderError {
    Io(io::Error),
    Serialization(serde_json::Error),
    Launch { program: String, source: io::Error },
    Config(ConfigError),
    DataFrame(PolarsError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Io(err) => write!(f, "io error: {err}"),
            RenderError::Serialization(err) => write!(f, "serialization error: {err}"),
            RenderError::Launch { program, source } => {
                write!(f, "could not launch viewer '{program}': {source}")
            }
            RenderError::Config(err) => write!(f, "{err}"),
            RenderError::DataFrame(err) => write!(f, "dataframe conversion error: {err}"),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<io::Error> for RenderError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

impl From<ConfigError> for RenderError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<PolarsError> for RenderError {
    fn from(value: PolarsError) -> Self {
        Self::DataFrame(value)
    }
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Somewhere a finished chart can be shown.
pub trait ChartSink {
    fn present(&self, chart: &GanttChart) -> RenderResult<()>;
}

/// Standalone HTML page that draws the chart with plotly.js.
pub fn render_html(chart: &GanttChart) -> RenderResult<String> {
    let figure = serde_json::to_string(&chart.to_figure())?;
    // keep "</script>" inside string values from closing the tag early
    let figure = figure.replace("</", "<\\/");
    let title = chart
        .title()
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="gantt" style="width:100%;"></div>
<script>
const figure = {figure};
Plotly.newPlot("gantt", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#
    ))
}

/// Writes the chart as HTML and opens it in the platform's default viewer.
#[derive(Debug, Clone)]
pub struct BrowserSink {
    output_dir: PathBuf,
    open_viewer: bool,
}

impl BrowserSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            open_viewer: true,
        }
    }

    /// Only write the file; never spawn a viewer.
    pub fn without_viewer(mut self) -> Self {
        self.open_viewer = false;
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE_NAME)
    }

    pub fn write(&self, chart: &GanttChart) -> RenderResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_path();
        fs::write(&path, render_html(chart)?)?;
        info!(path = %path.display(), bars = chart.bars().len(), "wrote chart");
        Ok(path)
    }

    fn launch(path: &Path) -> RenderResult<()> {
        let (program, args) = viewer_command(path);
        debug!(program, ?args, "launching viewer");
        Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| RenderError::Launch {
                program: program.to_string(),
                source,
            })?;
        Ok(())
    }
}

impl ChartSink for BrowserSink {
    fn present(&self, chart: &GanttChart) -> RenderResult<()> {
        let path = self.write(chart)?;
        if self.open_viewer {
            Self::launch(&path)?;
        }
        Ok(())
    }
}

fn viewer_command(path: &Path) -> (&'static str, Vec<String>) {
    let target = path.display().to_string();
    if cfg!(target_os = "windows") {
        ("cmd", vec!["/C".into(), "start".into(), String::new(), target])
    } else if cfg!(target_os = "macos") {
        ("open", vec![target])
    } else {
        ("xdg-open", vec![target])
    }
}
