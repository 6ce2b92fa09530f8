use super::{rules_from_rows, zones_from_rows, Error, Sheets, Tables};
use calamine::{open_workbook_auto, Reader};
use std::{
    io::{Read, Seek},
    path::Path,
};
use tracing::debug;

/// Reads the zone table and the allow matrix from a workbook's sheets.
pub fn read(path: &Path, sheets: &Sheets) -> Result<Tables, Error> {
    let mut workbook = open_workbook_auto(path)?;
    let zones = zones_from_rows(&sheet(&mut workbook, &sheets.zones)?)?;
    let rules = rules_from_rows(&sheet(&mut workbook, &sheets.rules)?)?;
    Ok(Tables { zones, rules })
}

/// Returns a sheet's cells as trimmed strings.
///
/// The grid starts at the sheet's first non-empty row and column, so a table reads the same
/// wherever it sits on the sheet.
fn sheet<RS: Read + Seek>(
    workbook: &mut calamine::Sheets<RS>,
    name: &str,
) -> Result<Vec<Vec<String>>, Error> {
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Err(Error::MissingSheet(name.to_string()));
    }

    let range = workbook.worksheet_range(name)?;
    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    debug!(sheet = %name, start = ?range.start(), rows = rows.len(), "Read sheet");
    Ok(rows)
}
