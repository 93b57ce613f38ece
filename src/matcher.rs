//!
//! src/matcher.rs  Andrew Belles  Oct 14th, 2026
//!
//! Filters the catalog to identified tracks and joins it against
//! the unclaimed reference set
//!

use crate::types::{CatalogTable, IsrcSet, TrackRecord};

/// Keeps rows carrying a non-empty ISRC, order preserved
pub fn filter_identified(catalog: CatalogTable) -> Vec<TrackRecord> {
    catalog.rows.into_iter()
        .filter(|r| r.isrc.as_ref().is_some_and(|i| !i.as_str().is_empty()))
        .collect()
}

/// View over `identified` of the rows whose ISRC is unclaimed
pub fn match_unclaimed<'a>(identified: &'a [TrackRecord], unclaimed: &IsrcSet) ->
    Vec<&'a TrackRecord> {
    identified.iter()
        .filter(|r| r.isrc.as_ref().is_some_and(|i| unclaimed.contains(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Isrc;

    fn row(name: &str, isrc: Option<&str>) -> TrackRecord {
        TrackRecord {
            track_name: name.to_string(),
            album: "Lover".to_string(),
            release_date: "2019-08-23".to_string(),
            isrc: isrc.map(|i| Isrc(i.to_string()))
        }
    }

    fn unclaimed(values: &[&str]) -> IsrcSet {
        values.iter().filter_map(|v| Isrc::parse(v)).collect()
    }

    #[test]
    fn filters_then_matches() {
        let catalog = CatalogTable {
            rows: vec![row("one", Some("A1")), row("two", None), row("three", Some("C3"))]
        };
        let set = unclaimed(&["A1", "B2"]);

        let identified = filter_identified(catalog);
        let names: Vec<&str> = identified.iter().map(|r| r.track_name.as_str()).collect();
        assert_eq!(names, vec!["one", "three"]);

        let matches = match_unclaimed(&identified, &set);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].isrc, Some(Isrc("A1".into())));
    }

    #[test]
    fn empty_identifier_never_survives() {
        let catalog = CatalogTable { rows: vec![row("blank", Some("")), row("none", None)] };
        let identified = filter_identified(catalog);
        assert!(identified.is_empty());

        let mut set = unclaimed(&["A1"]);
        set.insert(Isrc(String::new()));
        assert!(match_unclaimed(&identified, &set).is_empty());
    }

    #[test]
    fn matches_correspond_exactly_to_membership() {
        let rows: Vec<TrackRecord> = (0..40)
            .map(|i| row(&format!("t{i}"), Some(format!("ISRC{}", i % 7).as_str())))
            .collect();
        let set = unclaimed(&["ISRC0", "ISRC3", "ISRC9"]);

        let identified = filter_identified(CatalogTable { rows });
        let matches = match_unclaimed(&identified, &set);

        for r in &identified {
            let member = set.contains(r.isrc.as_ref().unwrap());
            let matched = matches.iter().any(|m| std::ptr::eq(*m, r));
            assert_eq!(member, matched, "row {}", r.track_name);
        }
    }

    #[test]
    fn duplicated_catalog_rows_match_each_time() {
        let catalog = CatalogTable { rows: vec![row("a", Some("A1")), row("a", Some("A1"))] };
        let identified = filter_identified(catalog);
        assert_eq!(match_unclaimed(&identified, &unclaimed(&["A1"])).len(), 2);
    }
}
