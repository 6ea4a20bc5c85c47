pub mod chart;
pub mod color;
pub mod config;
pub mod persistence;
pub mod render;
pub mod session;
pub mod table;
pub mod task;

pub use chart::{Bar, GanttChart};
pub use color::{ColorScale, Rgb};
pub use config::{ChartConfig, ConfigError, Margin};
pub use persistence::{
    BadRowPolicy, LoadError, LoadOptions, load_tasks_from_csv, load_tasks_from_csv_with,
    load_tasks_from_reader,
};
pub use render::{BrowserSink, ChartSink, RenderError, render_html};
pub use session::{SessionError, SessionOptions, SessionOutcome, run_session};
pub use table::TaskTable;
pub use task::Task;
