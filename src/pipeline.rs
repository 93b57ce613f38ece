//!
//! src/pipeline.rs  Andrew Belles  Oct 14th, 2026
//!
//! Runs loader, fetcher, matcher and reporter in order. The report is
//! only written once both the reference set and the catalog are in hand
//!

use tracing::{info, warn};

use crate::catalog::fetch_catalog;
use crate::config::PathsConfig;
use crate::errors::RunError;
use crate::fetch::{artist_id_from_handle, CatalogApi};
use crate::matcher::{filter_identified, match_unclaimed};
use crate::reference::load_or_build;
use crate::report::{write_report, ReportSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub unclaimed: usize,
    pub catalog: usize,
    pub identified: usize,
    pub report: ReportSummary
}

pub async fn run<A: CatalogApi + ?Sized>(paths: &PathsConfig, artist: &str, api: &A) ->
    Result<RunSummary, RunError> {

    let unclaimed = load_or_build(&paths.tsv_path, &paths.cache_path, paths.cache_level)?;

    let artist_id = artist_id_from_handle(artist)?;
    info!(artist = %artist_id, "pipeline.fetch.start");
    let catalog = fetch_catalog(api, &artist_id).await?;
    let catalog_len = catalog.len();
    if catalog.is_empty() {
        warn!(artist = %artist_id, "pipeline.catalog.empty");
    }

    let identified = filter_identified(catalog);
    let matches = match_unclaimed(&identified, &unclaimed);
    info!(identified = identified.len(), matches = matches.len(), "matcher.done");

    let report = write_report(&paths.output_path, &identified, &matches)?;

    Ok( RunSummary {
        unclaimed: unclaimed.len(),
        catalog: catalog_len,
        identified: identified.len(),
        report
    })
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use super::*;
    use crate::catalog::fake::FakeCatalog;

    const TSV: &str = "WORK_ID\tISRC\n1\tA1\n2\tA1\n3\tB2\n4\t\n";

    fn paths_in(dir: &Path) -> PathsConfig {
        PathsConfig {
            tsv_path: dir.join("unclaimed.tsv"),
            cache_path: dir.join("isrc_cache.json.zst"),
            output_path: dir.join("report.xlsx"),
            cache_level: 3
        }
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog::default()
            .with_release("r1", &[("t1", Some("A1")), ("t2", None)])
            .next_release_page()
            .with_release("r2", &[("t3", Some("C3"))])
    }

    #[tokio::test]
    async fn end_to_end_run_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::write(&paths.tsv_path, TSV).unwrap();

        let summary = run(&paths, "spotify:artist:abc123", &catalog()).await.unwrap();
        assert_eq!(summary, RunSummary {
            unclaimed: 2,
            catalog: 3,
            identified: 2,
            report: ReportSummary { catalog_rows: 2, match_rows: 1 }
        });
        assert!(paths.output_path.exists());
        assert!(paths.cache_path.exists());
    }

    #[tokio::test]
    async fn empty_catalog_still_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::write(&paths.tsv_path, TSV).unwrap();

        let summary = run(&paths, "abc123", &FakeCatalog::default()).await.unwrap();
        assert_eq!(summary.catalog, 0);
        assert_eq!(summary.report, ReportSummary { catalog_rows: 0, match_rows: 0 });
        assert!(paths.output_path.exists());
    }

    #[tokio::test]
    async fn missing_reference_file_stops_before_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        let api = catalog();

        let err = run(&paths, "abc123", &api).await.unwrap_err();
        assert_eq!(err.stage(), "loader");
        assert_eq!(*api.release_calls.lock().unwrap(), 0);
        assert!(!paths.output_path.exists());
    }

    #[tokio::test]
    async fn fetch_failure_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::write(&paths.tsv_path, TSV).unwrap();
        let mut api = catalog();
        api.fail_release_page = Some(1);

        let err = run(&paths, "abc123", &api).await.unwrap_err();
        assert_eq!(err.stage(), "fetcher");
        assert!(!paths.output_path.exists());
    }

    #[tokio::test]
    async fn fetch_failure_keeps_previous_report_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::write(&paths.tsv_path, TSV).unwrap();
        fs::write(&paths.output_path, "previous report").unwrap();
        let mut api = catalog();
        api.fail_release_page = Some(0);

        assert!(run(&paths, "abc123", &api).await.is_err());
        assert_eq!(fs::read_to_string(&paths.output_path).unwrap(), "previous report");
    }

    #[tokio::test]
    async fn bad_artist_handle_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let paths = paths_in(dir.path());
        fs::write(&paths.tsv_path, TSV).unwrap();

        let err = run(&paths, "spotify:artist:", &catalog()).await.unwrap_err();
        assert_eq!(err.stage(), "fetcher");
    }
}
