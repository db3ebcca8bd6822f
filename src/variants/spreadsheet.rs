//! Spreadsheet variant files.
//!
//! Only the first worksheet is read. Column `A` holds the chromosome and
//! column `B` holds the position.

use std::path::Path;

use calamine::Data;
use calamine::Range;
use calamine::Reader as _;
use calamine::open_workbook_auto;
use tracing::trace;

use crate::Variant;
use crate::variants::Error;
use crate::variants::FormatError;
use crate::variants::Producer;
use crate::variants::Result;
use crate::variants::format::Detection;
use crate::variants::header;

/// The file extensions (compared case-insensitively) that mark a spreadsheet.
pub const EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// The column holding the chromosome.
const CHROMOSOME_COLUMN: u32 = 0;

/// The column holding the position.
const POSITION_COLUMN: u32 = 1;

/// Returns whether the extension of `path` names a spreadsheet.
pub fn has_spreadsheet_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

/// Opens the spreadsheet at `path` and binds a producer to its first
/// worksheet.
pub(crate) fn detect(path: &Path) -> Result<Detection> {
    let mut workbook = open_workbook_auto(path).map_err(Error::Spreadsheet)?;

    match workbook.worksheet_range_at(0) {
        Some(range) => {
            let range = range.map_err(Error::Spreadsheet)?;
            Ok(Detection::Bound(Producer::Spreadsheet(Rows::new(range))))
        }
        None => Ok(Detection::Rejected(FormatError::NoWorksheets)),
    }
}

/// Renders a cell as text.
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::Error(e)) => format!("#ERR:{e:?}"),
        Some(Data::DateTime(dt)) => dt.to_string(),
        Some(Data::DateTimeIso(s)) => s.clone(),
        Some(Data::DurationIso(s)) => s.clone(),
    }
}

/// Renders a position cell as text.
///
/// Numeric cells are truncated to an integer (spreadsheets commonly store
/// positions as floats). Anything that does not read as a number, such as a
/// `Start` header label, is kept as text.
fn position_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => (f.trunc() as i64).to_string(),
        Some(Data::String(s)) => match s.trim().parse::<i64>() {
            Ok(position) => position.to_string(),
            Err(_) => s.clone(),
        },
        other => cell_text(other),
    }
}

/// An iterator over the rows of the first worksheet of a spreadsheet.
///
/// Unlike the VCF and tab-delimited readers, the whole worksheet is loaded
/// into memory when the file is opened. Only the conversion of rows into
/// [`Variant`]s happens one step at a time.
#[derive(Debug)]
pub struct Rows {
    /// The worksheet.
    range: Range<Data>,

    /// The next (absolute) row to read.
    row: u32,

    /// The last (absolute) row of the worksheet, if it has any cells.
    last_row: Option<u32>,

    /// The first and last (absolute) columns of the worksheet.
    columns: (u32, u32),

    /// Whether or not the first row has been seen.
    seen_first: bool,
}

impl Rows {
    /// Creates a new [`Rows`] from a worksheet.
    pub(crate) fn new(range: Range<Data>) -> Self {
        let (row, columns, last_row) = match (range.start(), range.end()) {
            (Some(start), Some(end)) => (start.0, (start.1, end.1), Some(end.0)),
            _ => (0, (0, 0), None),
        };

        Self {
            range,
            row,
            last_row,
            columns,
            seen_first: false,
        }
    }

    /// Returns the lowercased text of every cell in `row`.
    fn row_text(&self, row: u32) -> Vec<String> {
        (self.columns.0..=self.columns.1)
            .map(|column| cell_text(self.range.get_value((row, column))).to_lowercase())
            .collect()
    }
}

impl Iterator for Rows {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        let last_row = self.last_row?;

        while self.row <= last_row {
            let row = self.row;
            self.row += 1;

            let chromosome = cell_text(self.range.get_value((row, CHROMOSOME_COLUMN)));
            let position = position_text(self.range.get_value((row, POSITION_COLUMN)));

            if chromosome.is_empty() && position.is_empty() {
                continue;
            }

            if !self.seen_first {
                self.seen_first = true;

                let cells = self.row_text(row);
                if header::is_header(cells.iter().map(String::as_str)) {
                    trace!("skipping header row: {}", row + 1);
                    continue;
                }
            }

            return Some(Ok(Variant::new(chromosome, position)));
        }

        None
    }
}
