//! Tab-delimited variant files.

use std::io::BufRead;
use std::path::Path;

use tracing::trace;

use crate::Variant;
use crate::variants;
use crate::variants::Error;
use crate::variants::FormatError;
use crate::variants::ParseError;
use crate::variants::Producer;
use crate::variants::Result;
use crate::variants::format::Detection;
use crate::variants::header;

/// The delimiter between columns.
pub const DELIMITER: char = '\t';

/// The minimum number of columns the first line must have for a file to be
/// considered tab-delimited.
pub const MIN_COLUMNS: usize = 5;

/// The byte that ends the probed line.
const NEW_LINE: u8 = b'\n';

/// Detects whether the file at `path` is tab-delimited by counting the columns
/// of its first line.
pub(crate) fn detect(path: &Path) -> Result<Detection> {
    let mut reader = variants::open(path).map_err(Error::Io)?;

    let mut line = Vec::new();
    reader
        .read_until(NEW_LINE, &mut line)
        .map_err(Error::Io)?;

    let found = count_columns(&line);
    if found < MIN_COLUMNS {
        return Ok(Detection::Rejected(FormatError::TooFewColumns { found }));
    }

    // The probe only ever looks at the first line, so the producer gets a
    // fresh handle that starts at the top of the file.
    drop(reader);
    let reader = variants::open(path).map_err(Error::Io)?;
    Ok(Detection::Bound(Producer::Tab(Records::new(reader))))
}

/// Counts the tab-delimited columns in a raw line.
fn count_columns(line: &[u8]) -> usize {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    let line = line.strip_suffix(b"\r").unwrap_or(line);

    if line.is_empty() {
        return 0;
    }

    line.iter().filter(|b| **b == DELIMITER as u8).count() + 1
}

/// An iterator over the variants in a tab-delimited file.
///
/// Only the first two columns of each line are used. The first line is
/// skipped if it [looks like a header](header::is_header). Blank lines are
/// skipped.
pub struct Records {
    /// The underlying reader.
    reader: Box<dyn BufRead>,

    /// The line buffer.
    buffer: String,

    /// The number of lines read so far.
    line_no: usize,
}

impl Records {
    /// Creates a new [`Records`].
    pub(crate) fn new(reader: Box<dyn BufRead>) -> Self {
        Self {
            reader,
            buffer: String::new(),
            line_no: 0,
        }
    }
}

impl std::fmt::Debug for Records {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records")
            .field("line_no", &self.line_no)
            .finish()
    }
}

impl Iterator for Records {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match variants::read_line(&mut self.reader, &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => return Some(Err(Error::Io(err))),
            }

            self.line_no += 1;

            if self.buffer.is_empty() {
                continue;
            }

            if self.line_no == 1 && header::is_header(self.buffer.split(DELIMITER)) {
                trace!("skipping header line: {}", self.buffer);
                continue;
            }

            return Some(parse_line(&self.buffer, self.line_no));
        }
    }
}

/// Parses the first two columns of a line into a [`Variant`].
fn parse_line(line: &str, line_no: usize) -> Result<Variant> {
    let mut fields = line.split(DELIMITER);

    // SAFETY: `split()` always yields at least one item.
    let chromosome = fields.next().unwrap();
    let position = fields
        .next()
        .ok_or(Error::Parse(ParseError::MissingPosition { line: line_no }))?;

    Ok(Variant::new(chromosome, position))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn records(data: &'static [u8]) -> Records {
        Records::new(Box::new(Cursor::new(data)))
    }

    #[test]
    fn test_count_columns() {
        assert_eq!(count_columns(b""), 0);
        assert_eq!(count_columns(b"\n"), 0);
        assert_eq!(count_columns(b"chrom\tstart\tend\n"), 3);
        assert_eq!(count_columns(b"a\tb\tc\td\te\r\n"), 5);
        assert_eq!(count_columns(b"a\tb\tc\td\te\tf"), 6);
    }

    #[test]
    fn test_records_with_header() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variants = records(
            b"chrom\tstart\tend\n\
              chr1\t7571115\t7571115\tC\tT\n\
              chr1\t7572645\t7572645\tG\tA\n\
              chr1\t7573472\t7573472\tA\tG\n",
        )
        .collect::<Result<Vec<_>>>()?;

        assert_eq!(
            variants,
            vec![
                Variant::new("chr1", "7571115"),
                Variant::new("chr1", "7572645"),
                Variant::new("chr1", "7573472"),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_records_without_header() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variants = records(
            b"chr1\t7571115\t7571115\tC\tT\n\
              chr1\t7572645\t7572645\tG\tA\n\
              chr1\t7573472\t7573472\tA\tG",
        )
        .collect::<Result<Vec<_>>>()?;

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0], Variant::new("chr1", "7571115"));
        assert_eq!(variants[2], Variant::new("chr1", "7573472"));

        Ok(())
    }

    #[test]
    fn test_header_only_on_first_line() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variants = records(
            b"chr1\t100\t100\tC\tT\n\
              chr1\t200\t200\tG\tA\tPREF1\n",
        )
        .collect::<Result<Vec<_>>>()?;

        assert_eq!(variants.len(), 2);
        Ok(())
    }

    #[test]
    fn test_keyword_in_first_row() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // Known approximation of the header heuristic.
        let variants = records(
            b"chr1\t100\t100\tC\tT\tPREF1\n\
              chr1\t200\t200\tG\tA\n",
        )
        .collect::<Result<Vec<_>>>()?;

        assert_eq!(variants, vec![Variant::new("chr1", "200")]);
        Ok(())
    }

    #[test]
    fn test_blank_lines_are_skipped() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variants = records(b"chr1\t100\t100\tC\tT\r\n\r\n\nchr2\t5\t5\tA\tG\n\n")
            .collect::<Result<Vec<_>>>()?;

        assert_eq!(
            variants,
            vec![Variant::new("chr1", "100"), Variant::new("chr2", "5")]
        );
        Ok(())
    }

    #[test]
    fn test_missing_position() {
        let mut records = records(b"chr1\t100\t100\tC\tT\nchr2\n");
        assert!(records.next().unwrap().is_ok());

        let err = records.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "parse error: missing position column: line 2");

        assert!(records.next().is_none());
    }
}
