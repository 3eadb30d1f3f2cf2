//! CLI entry point for the grade dashboard.
//!
//! Loads a student score sheet, applies the class/search/sort criteria, and
//! prints a summary, a rounded table, or an unrounded CSV export of the view.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use grade_dashboard::{
    config::DashboardConfig,
    output::{
        DashboardReport, default_export_name, export_to_path, print_pretty, render_summary,
        render_table, report_json,
    },
    parser::read_source,
    session::Dashboard,
    view::{ClassFilter, Criteria, SortKey},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "grade_dashboard")]
#[command(about = "Statistics, tables and exports for student score sheets", long_about = None)]
struct Cli {
    /// JSON config file (defaults to $GRADE_DASHBOARD_CONFIG, then built-in settings)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ViewArgs {
    /// CSV score sheet, optionally gzip-compressed (.gz)
    #[arg(value_name = "FILE")]
    source: PathBuf,

    /// Class to show: "all" or a class number
    #[arg(short, long, default_value = "all")]
    class: ClassFilter,

    /// Case-insensitive match on name or roster number
    #[arg(short, long, default_value = "")]
    search: String,

    /// Sort order: number, total-desc, total-asc, final-desc (anything else keeps file order)
    #[arg(long, default_value = "number")]
    sort: String,
}

impl ViewArgs {
    fn criteria(&self) -> Criteria {
        Criteria::new(self.class, self.search.as_str(), SortKey::from(self.sort.as_str()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics for the selected students
    Summary {
        #[command(flatten)]
        view: ViewArgs,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the selected students as a table
    Table {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Export the selected students to CSV without rounding
    Export {
        #[command(flatten)]
        view: ViewArgs,

        /// Output file (defaults to <prefix>_<date>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Gzip compress the exported file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/grade_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("grade_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Summary { view, json } => {
            let dashboard = open_dashboard(config, &view)?;
            let report = DashboardReport::new(dashboard.criteria().clone(), dashboard.summary());
            print_pretty(&report);

            if json {
                println!("{}", report_json(&report)?);
            } else {
                print!(
                    "{}",
                    render_summary(&report.summary, dashboard.config().display_decimals)
                );
            }
        }
        Commands::Table { view } => {
            let dashboard = open_dashboard(config, &view)?;
            print!(
                "{}",
                render_table(dashboard.view(), dashboard.config().display_decimals)
            );
        }
        Commands::Export { view, output, gzip } => {
            let dashboard = open_dashboard(config, &view)?;
            let path = output.unwrap_or_else(|| {
                PathBuf::from(default_export_name(
                    &dashboard.config().export_prefix,
                    Utc::now().date_naive(),
                    gzip,
                ))
            });

            export_to_path(&path, dashboard.view(), gzip)?;
            info!(
                path = %path.display(),
                rows = dashboard.view_len(),
                "CSV export complete"
            );
        }
    }

    Ok(())
}

/// Resolves the config from `--config`, then `GRADE_DASHBOARD_CONFIG`, then defaults.
fn load_config(flag: Option<&str>) -> Result<DashboardConfig> {
    let path = flag
        .map(str::to_string)
        .or_else(|| std::env::var("GRADE_DASHBOARD_CONFIG").ok());

    match path {
        Some(path) => {
            info!(path = %path, "Loading config");
            Ok(DashboardConfig::load(&path)?)
        }
        None => Ok(DashboardConfig::default()),
    }
}

/// Reads the score sheet and builds a dashboard showing the requested view.
#[tracing::instrument(skip(config, view), fields(source = %view.source.display()))]
fn open_dashboard(config: DashboardConfig, view: &ViewArgs) -> Result<Dashboard> {
    let text = read_source(&view.source)?;

    let mut dashboard = Dashboard::new(config);
    if let Err(e) = dashboard.load(&text) {
        error!(error = %e, "Could not load grade data");
        return Err(e.into());
    }
    dashboard.set_criteria(view.criteria());

    info!(
        students = dashboard.records().len(),
        shown = dashboard.view_len(),
        criteria = ?dashboard.criteria(),
        "View ready"
    );
    Ok(dashboard)
}
