//!
//! src/catalog.rs  Andrew Belles  Oct 14th, 2026
//!
//! Assembles one artist's catalog: releases, then each release's
//! tracks, then track details fetched in fixed size batches
//!

use tracing::{debug, info};

use crate::errors::FetchError;
use crate::fetch::{CatalogApi, FullTrack};
use crate::paging::{Pages, ReleaseListing, TrackListing};
use crate::types::{CatalogTable, Isrc, TrackRecord};

/// Max ids per GET /v1/tracks call
pub const TRACK_BATCH_SIZE: usize = 50;

impl From<FullTrack> for TrackRecord {
    fn from(t: FullTrack) -> Self {
        TrackRecord {
            track_name: t.name,
            album: t.album.name,
            release_date: t.album.release_date.unwrap_or_default(),
            isrc: t.external_ids.isrc.as_deref().and_then(Isrc::parse)
        }
    }
}

/// Any failure aborts the whole fetch, there is no partial catalog
pub async fn fetch_catalog<A: CatalogApi + ?Sized>(api: &A, artist_id: &str) ->
    Result<CatalogTable, FetchError> {

    let releases = Pages::new(ReleaseListing { api, artist_id }).collect_all().await?;
    info!(artist = artist_id, releases = releases.len(), "catalog.releases");

    let mut track_ids: Vec<String> = Vec::new();
    for release in &releases {
        let mut pages = Pages::new(TrackListing { api, release_id: &release.id });
        while let Some(items) = pages.next_page().await? {
            for track in items {
                match track.id {
                    Some(id) => track_ids.push(id),
                    None => debug!(release = %release.name, track = %track.name,
                        "catalog.track.no_id"),
                }
            }
        }
        debug!(release = %release.name, kind = ?release.album_type,
            total = track_ids.len(), "catalog.release.done");
    }
    info!(tracks = track_ids.len(), batch = TRACK_BATCH_SIZE, "catalog.tracks");

    let mut rows = Vec::with_capacity(track_ids.len());
    for (batch, chunk) in track_ids.chunks(TRACK_BATCH_SIZE).enumerate() {
        let details = api.tracks(chunk).await?;
        let before = rows.len();
        rows.extend(details.into_iter().flatten().map(TrackRecord::from));
        debug!(batch, requested = chunk.len(), produced = rows.len() - before,
            "catalog.batch");
    }

    info!(rows = rows.len(), "catalog.done");
    Ok(CatalogTable { rows })
}
