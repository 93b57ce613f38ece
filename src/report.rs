//!
//! src/report.rs  Andrew Belles  Oct 14th, 2026
//!
//! Writes the two sheet xlsx report: the identified catalog and
//! the subset found in the unclaimed dataset
//!

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use crate::errors::ReportError;
use crate::types::{Isrc, TrackRecord};

pub const CATALOG_SHEET: &str = "Artist Catalog (All)";
pub const MATCHES_SHEET: &str = "Matches in Unclaimed Dataset";
pub const COLUMNS: [&str; 4] = ["track_name", "album", "release_date", "isrc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub catalog_rows: usize,
    pub match_rows: usize
}

/// Creates or overwrites `path` in place; there is no atomic replace,
/// a crash mid save can leave a partial file behind
pub fn write_report(path: &Path, catalog: &[TrackRecord], matches: &[&TrackRecord]) ->
    Result<ReportSummary, ReportError> {

    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    let catalog_rows = write_sheet(
        workbook.add_worksheet(), CATALOG_SHEET, catalog.iter(), &header
    )?;
    let match_rows = write_sheet(
        workbook.add_worksheet(), MATCHES_SHEET, matches.iter().copied(), &header
    )?;

    workbook.save(path)?;
    info!(path = %path.display(), catalog_rows, match_rows, "report.written");
    Ok( ReportSummary { catalog_rows, match_rows } )
}

/// Header row then one row per record, no index column
fn write_sheet<'a>(
    sheet: &mut Worksheet,
    name: &str,
    rows: impl Iterator<Item = &'a TrackRecord>,
    header: &Format
) -> Result<usize, ReportError> {
    sheet.set_name(name)?;
    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, header)?;
    }

    let mut written = 0_usize;
    for record in rows {
        let row = u32::try_from(written + 1)
            .map_err(|_| ReportError::Xlsx(format!("{name}: too many rows")))?;
        let cells = [
            record.track_name.as_str(),
            record.album.as_str(),
            record.release_date.as_str(),
            record.isrc.as_ref().map(Isrc::as_str).unwrap_or_default(),
        ];
        for (col, value) in cells.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row, col as u16, *value)?;
            }
        }
        written += 1;
    }

    sheet.autofit();
    Ok(written)
}
