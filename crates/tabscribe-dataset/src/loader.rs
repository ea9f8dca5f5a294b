//! Spreadsheet parsing into a [`Table`].
//!
//! Loading flow:
//! 1. Open the workbook (`.xlsx`/`.xls`/`.ods`, auto-detected by calamine)
//! 2. Pick the configured sheet, or the workbook's first sheet
//! 3. First row of the used range → headers, trimmed and lowercased
//! 4. Remaining rows → [`Cell`] rows, one per spreadsheet row
//!
//! Any failure here is a startup failure: the caller is expected to treat a
//! load error as fatal rather than serving an empty table.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info};

use crate::errors::{DatasetError, Result};
use crate::table::{Cell, Table};

/// Load the dataset from a spreadsheet file.
///
/// `sheet` selects a worksheet by name; `None` uses the first sheet in the
/// workbook. Headers are normalized with [`normalize_header`] before they
/// become the queryable column set.
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(DatasetError::NoSheets)?,
    };
    debug!(sheet = %sheet_name, path = %path.display(), "reading worksheet");

    let range = workbook.worksheet_range(&sheet_name)?;
    let table = assemble(range.rows().map(<[Data]>::to_vec))?;

    info!(
        rows = table.len(),
        columns = table.columns().len(),
        sheet = %sheet_name,
        "dataset loaded"
    );
    Ok(table)
}

/// Normalize a raw header: trim surrounding whitespace, lowercase.
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Build a [`Table`] from an iterator of spreadsheet rows.
///
/// The first yielded row is the header row; an empty iterator is an error.
fn assemble(mut rows: impl Iterator<Item = Vec<Data>>) -> Result<Table> {
    let header = rows.next().ok_or(DatasetError::EmptySheet)?;
    let columns = header
        .iter()
        .map(|raw| normalize_header(&header_text(raw)))
        .collect();

    let data = rows
        .map(|row| row.iter().map(cell_from).collect())
        .collect();
    Table::new(columns, data)
}

/// Render a header cell as text. Non-text headers (numeric sheet labels)
/// are stringified; empty and error cells yield an empty string, which the
/// caller rejects.
fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTime(_) | Data::Error(_) | Data::Empty => String::new(),
    }
}

/// Map one spreadsheet cell onto the table's scalar model.
///
/// Date-time serials keep their raw float value; cell-level errors (`#DIV/0!`
/// and friends) carry no scalar value and load as null.
fn cell_from(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Float(*f),
        Data::Int(i) => Cell::Int(*i),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Null,
    }
}
