//!
//! src/cache.rs  Andrew Belles  Oct 14th, 2026
//!
//! Reads and writes the ISRC cache artifact, a zstd compressed
//! json document private to this program
//!

use std::{fs, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::LoadError;
use crate::types::{Isrc, IsrcSet};

pub const CACHE_VERSION: u16 = 1;

#[derive(Serialize)]
struct CacheOut<'a> {
    version: u16,
    isrcs: Vec<&'a Isrc>
}

#[derive(Deserialize)]
struct CacheIn {
    version: u16,
    isrcs: Vec<Isrc>
}

pub fn read_isrc_cache(path: &Path) -> Result<IsrcSet, LoadError> {
    let file = fs::File::open(path)?;
    let dec = zstd::stream::read::Decoder::new(BufReader::new(file))
        .map_err(|e| LoadError::Cache(format!("zstd decoder {}: {e}", path.display())))?;

    let doc: CacheIn = serde_json::from_reader(dec)
        .map_err(|e| LoadError::Cache(format!("decode {}: {e}", path.display())))?;

    if doc.version != CACHE_VERSION {
        return Err(LoadError::Cache(format!(
            "{} has version {}, expected {CACHE_VERSION}", path.display(), doc.version
        )));
    }
    Ok(doc.isrcs.into_iter().collect())
}

/// Written to a temp file in the target directory, then renamed into place
pub fn write_isrc_cache(path: &Path, set: &IsrcSet, level: i32) -> Result<(), LoadError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e|
        LoadError::Cache(format!("create dir {}: {e}", parent.display()))
    )?;

    let temp = tempfile::NamedTempFile::new_in(parent)
        .map_err(|e| LoadError::Cache(format!("tempfile in {}: {e}", parent.display())))?;

    {
        let mut enc = zstd::stream::write::Encoder::new(temp.as_file(), level.clamp(0, 21))
            .map_err(|e| LoadError::Cache(format!("zstd encoder: {e}")))?;

        let doc = CacheOut { version: CACHE_VERSION, isrcs: set.sorted() };
        serde_json::to_writer(&mut enc, &doc)
            .map_err(|e| LoadError::Cache(format!("serialize json: {e}")))?;
        enc.finish().map_err(|e| LoadError::Cache(format!("zstd finish: {e}")))?;
    }

    temp.persist(path).map_err(|e|
        LoadError::Cache(format!("persist {}: {e}", path.display()))
    )?;
    Ok(())
}
