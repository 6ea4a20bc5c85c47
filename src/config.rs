use crate::color::ColorScale;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
    UnknownColorScale(String),
    InvalidRange { min: f64, max: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "io error: {err}"),
            ConfigError::Parse(err) => write!(f, "invalid chart config: {err}"),
            ConfigError::UnknownColorScale(name) => write!(
                f,
                "unknown color scale '{name}' (expected one of {})",
                ColorScale::NAMES.join(", ")
            ),
            ConfigError::InvalidRange { min, max } => {
                write!(f, "color range [{min}, {max}] must be finite with min < max")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<io::Error> for ConfigError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: 80,
            r: 40,
            t: 80,
            b: 120,
        }
    }
}

/// Cosmetic settings for the rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub font_size: u32,
    pub color_scale: String,
    pub color_range: [f64; 2],
    pub colorbar_title: String,
    pub margin: Margin,
    /// Pixels of plot height per task row.
    pub height_per_task: u32,
    pub min_height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "Project Gantt Chart".to_string(),
            x_axis_title: "Timeline".to_string(),
            y_axis_title: "Tasks".to_string(),
            font_size: 12,
            color_scale: "RdYlGn".to_string(),
            color_range: [0.0, 100.0],
            colorbar_title: "Progress (%)".to_string(),
            margin: Margin::default(),
            height_per_task: 40,
            min_height: 400,
        }
    }
}

impl ChartConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file = File::open(path)?;
        let config: ChartConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let [min, max] = self.color_range;
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(ConfigError::InvalidRange { min, max });
        }
        self.scale().map(|_| ())
    }

    /// The configured color scale with the configured domain applied.
    pub fn scale(&self) -> ConfigResult<ColorScale> {
        let [min, max] = self.color_range;
        ColorScale::named(&self.color_scale)
            .map(|scale| scale.with_domain(min, max))
            .ok_or_else(|| ConfigError::UnknownColorScale(self.color_scale.clone()))
    }

    pub fn plot_height(&self, task_count: usize) -> u32 {
        let rows = u32::try_from(task_count).unwrap_or(u32::MAX);
        rows.saturating_mul(self.height_per_task)
            .saturating_add(self.margin.t + self.margin.b)
            .max(self.min_height)
    }
}
