//!
//! src/main.rs  Andrew Belles  Oct 14th, 2026
//!
//! Entry point of the matcher: loads config, starts the logger and
//! dispatches the pipeline, logging the outcome of the run
//!
//!

mod config;
mod errors;
mod logging;
mod types;

mod cache;
mod catalog;
mod fetch;
mod matcher;
mod paging;
mod pipeline;
mod reference;
mod report;

use std::time::Instant;

use crate::errors::RunError;

/// Failures are logged and main returns normally, no exit codes
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let start = Instant::now();

    let cfgs = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let _logger = match logging::init_logging(&cfgs.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    tracing::info!(
        service="isrc-matcher",
        version=%env!("CARGO_PKG_VERSION"),
        artist=%cfgs.artist,
        tsv=%cfgs.paths.tsv_path.display(),
        output=%cfgs.paths.output_path.display(),
        "starting"
    );

    match dispatch(&cfgs).await {
        Ok(summary) => tracing::info!(
            unclaimed = summary.unclaimed,
            catalog = summary.catalog,
            identified = summary.identified,
            matches = summary.report.match_rows,
            "run.complete"
        ),
        Err(e) => tracing::error!(stage = e.stage(), error = %e, "run.aborted"),
    }

    tracing::info!(elapsed_secs = start.elapsed().as_secs_f64(), "run.finished");
}

async fn dispatch(cfgs: &config::AppConfig) -> Result<pipeline::RunSummary, RunError> {
    let spotify = fetch::SpotifyClient::new(&cfgs.http, &cfgs.spotify)?;
    pipeline::run(&cfgs.paths, &cfgs.artist, &spotify).await
}
