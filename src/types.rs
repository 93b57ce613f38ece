use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// International standard recording code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isrc(pub String);

impl Isrc {
    /// None for an empty value, which is treated as "no identifier"
    pub fn parse(raw: &str) -> Option<Isrc> {
        if raw.is_empty() { None } else { Some(Isrc(raw.to_string())) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Isrc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference set of unclaimed ISRCs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IsrcSet(HashSet<Isrc>);

impl IsrcSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, isrc: Isrc) -> bool {
        self.0.insert(isrc)
    }

    pub fn contains(&self, isrc: &Isrc) -> bool {
        self.0.contains(isrc)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable ordering for serialization
    pub fn sorted(&self) -> Vec<&Isrc> {
        let mut all: Vec<&Isrc> = self.0.iter().collect();
        all.sort();
        all
    }
}

impl FromIterator<Isrc> for IsrcSet {
    fn from_iter<I: IntoIterator<Item = Isrc>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub track_name: String,
    pub album: String,
    pub release_date: String,
    pub isrc: Option<Isrc>
}

/// Every track of one artist across its releases, in fetch order.
/// Not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTable {
    pub rows: Vec<TrackRecord>
}

impl CatalogTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
