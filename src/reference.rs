//!
//! src/reference.rs  Andrew Belles  Oct 14th, 2026
//!
//! Builds the unclaimed ISRC reference set from the rights share tsv,
//! or restores it from the cache artifact when one exists
//!

use std::{fs, io, path::Path};

use tracing::{info, warn};

use crate::cache::{read_isrc_cache, write_isrc_cache};
use crate::errors::LoadError;
use crate::types::{Isrc, IsrcSet};

pub const ISRC_COLUMN: &str = "ISRC";

/// The cache is trusted on existence alone. It is never compared
/// against the tsv; delete it by hand to force a rebuild.
pub fn load_or_build(tsv_path: &Path, cache_path: &Path, level: i32) ->
    Result<IsrcSet, LoadError> {

    if cache_path.exists() {
        let set = read_isrc_cache(cache_path)?;
        info!(cache = %cache_path.display(), count = set.len(), "reference.cache.hit");
        return Ok(set);
    }

    info!(tsv = %tsv_path.display(), "reference.cache.miss");
    let set = scan_tsv(tsv_path)?;
    if set.is_empty() {
        warn!(tsv = %tsv_path.display(), column = ISRC_COLUMN, "reference.empty");
    }

    write_isrc_cache(cache_path, &set, level)?;
    info!(count = set.len(), cache = %cache_path.display(), "reference.built");
    Ok(set)
}

pub fn scan_tsv(tsv_path: &Path) -> Result<IsrcSet, LoadError> {
    let file = fs::File::open(tsv_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(tsv_path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;
    scan_reader(file)
}

/// Rows without the column or with an empty value are skipped.
/// A header lacking the column yields an empty set; when the header
/// repeats the column the last one is read.
pub fn scan_reader<R: io::Read>(reader: R) -> Result<IsrcSet, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let Some(column) = rdr.headers()?.iter().collect::<Vec<_>>().iter().rposition(|h| *h == ISRC_COLUMN) else {
        return Ok(IsrcSet::new());
    };

    let mut set = IsrcSet::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(isrc) = record.get(column).and_then(Isrc::parse) {
            set.insert(isrc);
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
WORK_ID\tISRC\tTITLE
1\tA1\tFirst
2\tA1\tFirst again
3\tB2\tSecond
4\t\tBlank
";

    fn strs(set: &IsrcSet) -> Vec<&str> {
        set.sorted().into_iter().map(Isrc::as_str).collect()
    }

    #[test]
    fn duplicates_collapse_and_blanks_drop() {
        let set = scan_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(strs(&set), vec!["A1", "B2"]);
    }

    #[test]
    fn short_rows_are_skipped() {
        let tsv = "TITLE\tWORK_ID\tISRC\nonly title\nt\t7\tC3\n";
        let set = scan_reader(tsv.as_bytes()).unwrap();
        assert_eq!(strs(&set), vec!["C3"]);
    }

    #[test]
    fn missing_column_is_an_empty_set() {
        let set = scan_reader("WORK_ID\tTITLE\n1\tx\n".as_bytes()).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn repeated_column_reads_the_last() {
        let set = scan_reader("ISRC\tX\tISRC\nfirst\tx\tlast\n".as_bytes()).unwrap();
        assert_eq!(strs(&set), vec!["last"]);
    }

    #[test]
    fn invalid_utf8_is_a_tsv_error() {
        let bytes: &[u8] = b"ISRC\n\xff\xfe\n";
        assert!(matches!(scan_reader(bytes), Err(LoadError::Tsv(_))));
    }

    #[test]
    fn absent_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let tsv = dir.path().join("missing.tsv");
        let cache = dir.path().join("cache.zst");

        let err = load_or_build(&tsv, &cache, 3).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(p) if p == tsv));
        assert!(!cache.exists());
    }

    #[test]
    fn first_run_writes_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let tsv = dir.path().join("unclaimed.tsv");
        let cache = dir.path().join("cache.zst");
        fs::write(&tsv, SAMPLE).unwrap();

        let set = load_or_build(&tsv, &cache, 3).unwrap();
        assert!(cache.exists());
        assert_eq!(read_isrc_cache(&cache).unwrap(), set);
    }

    #[test]
    fn cache_wins_over_changed_tsv() {
        let dir = tempfile::tempdir().unwrap();
        let tsv = dir.path().join("unclaimed.tsv");
        let cache = dir.path().join("cache.zst");
        fs::write(&tsv, SAMPLE).unwrap();

        let first = load_or_build(&tsv, &cache, 3).unwrap();
        fs::write(&tsv, "ISRC\nZZ9\n").unwrap();

        let second = load_or_build(&tsv, &cache, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(strs(&second), vec!["A1", "B2"]);
    }

    #[test]
    fn cache_wins_even_when_tsv_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let tsv = dir.path().join("unclaimed.tsv");
        let cache = dir.path().join("cache.zst");
        fs::write(&tsv, SAMPLE).unwrap();

        let first = load_or_build(&tsv, &cache, 3).unwrap();
        fs::remove_file(&tsv).unwrap();
        assert_eq!(load_or_build(&tsv, &cache, 3).unwrap(), first);
    }

    #[test]
    fn rebuild_after_delete_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let tsv = dir.path().join("unclaimed.tsv");
        let cache = dir.path().join("cache.zst");
        fs::write(&tsv, SAMPLE).unwrap();

        let first = load_or_build(&tsv, &cache, 3).unwrap();
        let first_bytes = fs::read(&cache).unwrap();
        fs::remove_file(&cache).unwrap();

        let second = load_or_build(&tsv, &cache, 3).unwrap();
        assert_eq!(first, second);
        assert_eq!(fs::read(&cache).unwrap(), first_bytes);
    }
}
