mod bootstrap;
mod commands;

use anyhow::Result;
use chunkstats_core::settings::{Command, Settings};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("chunkstats v{} starting", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &settings.command {
        Command::Stats(args) => {
            tracing::info!(
                "Reading {} in chunks of {}",
                args.path.display(),
                args.chunk_size
            );
            commands::run_stats(args, &mut out)?;
        }
        Command::Histogram(args) => {
            tracing::info!(
                "Histogram of '{}' from {} ({} bins)",
                args.feature,
                args.path.display(),
                args.bins
            );
            let histogram = commands::run_histogram(args, &mut out)?;
            tracing::debug!("Binned {} values", histogram.total());
        }
    }

    Ok(())
}
