use gantt_tool::{
    BrowserSink, ChartConfig, LoadOptions, SessionOptions, SessionOutcome, run_session,
};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| !v.is_empty() && v != "0")
        .unwrap_or(false)
}

fn build_options() -> Result<SessionOptions, Box<dyn std::error::Error>> {
    let chart = match env::var("GANTT_TOOL_CONFIG") {
        Ok(path) => ChartConfig::from_json_file(&path)?,
        Err(_) => ChartConfig::default(),
    };
    let load = if env_flag("GANTT_TOOL_SKIP_BAD_ROWS") {
        LoadOptions::skipping_bad_rows()
    } else {
        LoadOptions::default()
    };
    Ok(SessionOptions {
        path: env::args_os().nth(1).map(PathBuf::from),
        load,
        chart,
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options()?;

    let output_dir = env::var_os("GANTT_TOOL_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir);
    let mut sink = BrowserSink::new(output_dir);
    if env_flag("GANTT_TOOL_NO_OPEN") {
        sink = sink.without_viewer();
    }

    let stdin = io::stdin();
    let outcome = run_session(stdin.lock(), io::stdout(), &sink, &options)?;
    if let SessionOutcome::Rendered { tasks } = outcome {
        info!(tasks, path = %sink.output_path().display(), "chart ready");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
