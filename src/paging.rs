//!
//! src/paging.rs  Andrew Belles  Oct 14th, 2026
//!
//! Cursor driven listings as lazy, restartable sequences of pages
//!

use async_trait::async_trait;

use crate::errors::FetchError;
use crate::fetch::{CatalogApi, Page, SimplifiedRelease, SimplifiedTrack};

/// One paginated endpoint. `next` is None for the first page
#[async_trait]
pub trait Listing: Send + Sync {
    type Item: Send;
    async fn page(&self, next: Option<&str>) -> Result<Page<Self::Item>, FetchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    Start,
    Next(String),
    Done
}

/// Finite: once the service stops returning a `next` link (or a page
/// fails) every further call yields None until `restart`
pub struct Pages<L: Listing> {
    listing: L,
    cursor: Cursor
}

impl<L: Listing> Pages<L> {
    pub fn new(listing: L) -> Self {
        Self { listing, cursor: Cursor::Start }
    }

    pub async fn next_page(&mut self) -> Result<Option<Vec<L::Item>>, FetchError> {
        let next = match &self.cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => None,
            Cursor::Next(link) => Some(link.clone()),
        };

        match self.listing.page(next.as_deref()).await {
            Ok(page) => {
                self.cursor = match page.next {
                    Some(link) if Some(&link) != next.as_ref() => Cursor::Next(link),
                    _ => Cursor::Done,
                };
                Ok(Some(page.items))
            }
            Err(e) => {
                self.cursor = Cursor::Done;
                Err(e)
            }
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn restart(&mut self) {
        self.cursor = Cursor::Start;
    }

    pub async fn collect_all(&mut self) -> Result<Vec<L::Item>, FetchError> {
        let mut all = Vec::new();
        while let Some(items) = self.next_page().await? {
            all.extend(items);
        }
        Ok(all)
    }
}

/// Albums and singles of one artist
pub struct ReleaseListing<'a, A: ?Sized> {
    pub api: &'a A,
    pub artist_id: &'a str
}

#[async_trait]
impl<'a, A: CatalogApi + ?Sized> Listing for ReleaseListing<'a, A> {
    type Item = SimplifiedRelease;

    async fn page(&self, next: Option<&str>) -> Result<Page<SimplifiedRelease>, FetchError> {
        self.api.artist_releases(self.artist_id, next).await
    }
}

/// Tracks of one release
pub struct TrackListing<'a, A: ?Sized> {
    pub api: &'a A,
    pub release_id: &'a str
}

#[async_trait]
impl<'a, A: CatalogApi + ?Sized> Listing for TrackListing<'a, A> {
    type Item = SimplifiedTrack;

    async fn page(&self, next: Option<&str>) -> Result<Page<SimplifiedTrack>, FetchError> {
        self.api.release_tracks(self.release_id, next).await
    }
}
