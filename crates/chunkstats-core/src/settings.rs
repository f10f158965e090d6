use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Stream a CSV file in fixed-size row chunks and summarise each chunk
#[derive(Parser, Debug, Clone)]
#[command(
    name = "chunkstats",
    about = "Stream a CSV file in fixed-size row chunks and summarise each chunk",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Command,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (stderr when absent)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Subcommands of the `chunkstats` binary.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print summary statistics for every chunk of a CSV file
    Stats(StatsArgs),
    /// Filter rows by a numeric column and print a histogram of a feature
    Histogram(HistogramArgs),
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// CSV file to read
    pub path: PathBuf,

    /// Rows per chunk
    #[arg(long, default_value = "100", allow_negative_numbers = true)]
    pub chunk_size: i64,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

#[derive(Args, Debug, Clone)]
pub struct HistogramArgs {
    /// CSV file to read
    pub path: PathBuf,

    /// Numeric column to bin
    #[arg(long)]
    pub feature: String,

    /// Column used to select rows
    #[arg(long, requires = "values")]
    pub filter_column: Option<String>,

    /// Accepted values of the filter column, comma separated
    #[arg(long, value_delimiter = ',', requires = "filter_column", allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Number of equal-width bins
    #[arg(long, default_value = "20")]
    pub bins: usize,

    /// Rows per chunk while streaming the file
    #[arg(long, default_value = "1000", allow_negative_numbers = true)]
    pub chunk_size: i64,

    /// Output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply the `--debug` override.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Settings::parse_from(args))
    }

    /// `--debug` overrides the log level.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
