use crate::color::{ColorScale, Rgb};
use crate::config::ChartConfig;
use crate::render::RenderResult;
use crate::{Task, TaskTable};
use chrono::NaiveDate;
use serde_json::{Value, json};

const MILLIS_PER_DAY: i64 = 86_400_000;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One horizontal bar of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub start: NaiveDate,
    pub finish: NaiveDate,
    pub progress: f64,
    /// Color plotly draws for `progress` given the trace's `colorscale`,
    /// `cmin` and `cmax`.
    pub fill: Rgb,
    pub hover: String,
}

impl Bar {
    fn from_task(task: Task, scale: &ColorScale) -> Self {
        let hover = hover_text(&task);
        Self {
            fill: scale.color_at(task.progress),
            label: task.task,
            start: task.start,
            finish: task.finish,
            progress: task.progress,
            hover,
        }
    }

    /// Bar length in milliseconds, as a date axis measures it.
    pub fn duration_millis(&self) -> i64 {
        (self.finish - self.start).num_days() * MILLIS_PER_DAY
    }
}

/// Tooltip lines for a task, in display order.
pub fn hover_lines(task: &Task) -> [String; 5] {
    [
        format!("Task: {}", escape_html(&task.task)),
        format!("Start: {}", task.start.format(DATE_FORMAT)),
        format!("Finish: {}", task.finish.format(DATE_FORMAT)),
        format!("Progress: {}%", task.progress),
        format!("Description: {}", escape_html(&task.description)),
    ]
}

pub fn hover_text(task: &Task) -> String {
    hover_lines(task).join("<br>")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// A Gantt chart ready to be handed to a viewer.
#[derive(Debug, Clone)]
pub struct GanttChart {
    bars: Vec<Bar>,
    scale: ColorScale,
    config: ChartConfig,
}

impl GanttChart {
    pub fn from_table(table: &TaskTable, config: &ChartConfig) -> RenderResult<Self> {
        let scale = config.scale()?;
        let bars = table
            .tasks()?
            .into_iter()
            .map(|task| Bar::from_task(task, &scale))
            .collect();
        Ok(Self {
            bars,
            scale,
            config: config.clone(),
        })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn scale(&self) -> &ColorScale {
        &self.scale
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn title(&self) -> &str {
        &self.config.title
    }

    /// Plotly figure (`data` + `layout`) for this chart.
    pub fn to_figure(&self) -> Value {
        let (cmin, cmax) = self.scale.domain();
        let margin = self.config.margin;

        let base: Vec<String> = self
            .bars
            .iter()
            .map(|bar| bar.start.format(DATE_FORMAT).to_string())
            .collect();
        let durations: Vec<i64> = self.bars.iter().map(Bar::duration_millis).collect();
        let labels: Vec<&str> = self.bars.iter().map(|bar| bar.label.as_str()).collect();
        let progress: Vec<f64> = self.bars.iter().map(|bar| bar.progress).collect();
        let hover: Vec<&str> = self.bars.iter().map(|bar| bar.hover.as_str()).collect();

        let trace = json!({
            "type": "bar",
            "orientation": "h",
            "base": base,
            "x": durations,
            "y": labels,
            "customdata": hover,
            "hovertemplate": "%{customdata}<extra></extra>",
            "marker": {
                "color": progress,
                "colorscale": self.scale.to_plotly(),
                "cmin": cmin,
                "cmax": cmax,
                "showscale": true,
                "colorbar": {
                    "title": { "text": self.config.colorbar_title, "side": "top" },
                    "orientation": "h",
                    "x": 0.5,
                    "xanchor": "center",
                    "y": -0.2,
                    "yanchor": "top",
                    "thickness": 15,
                },
            },
        });

        let layout = json!({
            "title": {
                "text": self.config.title,
                "x": 0.5,
                "xanchor": "center",
            },
            "xaxis": {
                "title": { "text": self.config.x_axis_title },
                "type": "date",
            },
            "yaxis": {
                "title": { "text": self.config.y_axis_title },
                "type": "category",
                "autorange": "reversed",
            },
            "font": { "size": self.config.font_size },
            "margin": { "l": margin.l, "r": margin.r, "t": margin.t, "b": margin.b },
            "height": self.config.plot_height(self.bars.len()),
            "barmode": "overlay",
            "showlegend": false,
        });

        json!({ "data": [trace], "layout": layout })
    }
}
