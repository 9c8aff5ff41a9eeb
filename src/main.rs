//! logwindow - Entry Point

use clap::Parser;
use logwindow::config::{self, CliOverrides};
use logwindow::model::AppError;
use logwindow::view::{self, ColorConfig};
use std::path::PathBuf;
use tracing::{error, info};

/// logwindow - scroll through an endless log with on-demand loading
#[derive(Parser, Debug)]
#[command(name = "logwindow")]
#[command(version)]
#[command(about = "Virtualized log viewer that loads older rows on demand and tails new ones")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Rows requested per fetch
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub batch_size: Option<u64>,

    /// Distance in rows from an edge that triggers a fetch
    #[arg(long)]
    pub load_threshold: Option<usize>,

    /// Extra rows rendered beyond each edge of the viewport
    #[arg(long)]
    pub overscan: Option<usize>,

    /// Rows generated before the first render
    #[arg(long)]
    pub initial_rows: Option<usize>,

    /// Simulated transport latency in milliseconds
    #[arg(long)]
    pub response_time_ms: Option<u64>,

    /// Reserve placeholder rows at the head while older rows load
    #[arg(long)]
    pub reserve_placeholders: bool,

    /// Show statistics panel on startup
    #[arg(long, overrides_with = "no_stats")]
    pub stats: bool,

    /// Hide statistics panel on startup
    #[arg(long, overrides_with = "stats")]
    pub no_stats: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Flags that were actually given, as config overrides.
    fn overrides(&self) -> CliOverrides {
        let show_stats = match (self.stats, self.no_stats) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        CliOverrides {
            batch_size: self.batch_size.map(|n| n as usize),
            load_threshold: self.load_threshold,
            overscan: self.overscan,
            initial_rows: self.initial_rows,
            response_time_ms: self.response_time_ms,
            reserve_placeholders: self.reserve_placeholders.then_some(true),
            show_stats,
            log_file_path: self.log_file.clone(),
        }
    }
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = config::resolve(args.config.clone(), args.overrides())?;

    logwindow::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let colors = ColorConfig::from_env_and_args(args.no_color);

    let result = runtime.block_on(view::run(&config, colors));
    if let Err(err) = &result {
        error!(error = %err, "Terminal UI exited with an error");
    }
    result.map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_does_not_error() {
        let result = Args::try_parse_from(["logwindow", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_does_not_error() {
        let err = Args::try_parse_from(["logwindow", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn no_args_means_no_overrides() {
        let args = Args::parse_from(["logwindow"]);
        assert_eq!(args.overrides(), CliOverrides::default());
        assert!(!args.no_color);
    }

    #[test]
    fn numeric_flags_become_overrides() {
        let args = Args::parse_from([
            "logwindow",
            "--batch-size",
            "50",
            "--load-threshold",
            "10",
            "--initial-rows",
            "2000",
            "--response-time-ms",
            "0",
        ]);

        let cli = args.overrides();

        assert_eq!(cli.batch_size, Some(50));
        assert_eq!(cli.load_threshold, Some(10));
        assert_eq!(cli.initial_rows, Some(2000));
        assert_eq!(cli.response_time_ms, Some(0));
        assert_eq!(cli.overscan, None);
    }

    #[test]
    fn batch_size_rejects_zero() {
        let err = Args::try_parse_from(["logwindow", "--batch-size", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn stats_flags_last_one_wins() {
        let on = Args::parse_from(["logwindow", "--no-stats", "--stats"]);
        let off = Args::parse_from(["logwindow", "--stats", "--no-stats"]);

        assert_eq!(on.overrides().show_stats, Some(true));
        assert_eq!(off.overrides().show_stats, Some(false));
    }

    #[test]
    fn reserve_placeholders_only_overrides_when_given() {
        let args = Args::parse_from(["logwindow", "--reserve-placeholders"]);
        assert_eq!(args.overrides().reserve_placeholders, Some(true));
    }
}
