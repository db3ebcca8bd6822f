//! Sources of variant coordinates.
//!
//! A [`Variants`] is created from a path to a file of variants. The format of
//! the file is detected when the source is built by trying each
//! [`Detector`](format::Detector) in a fixed priority order:
//!
//! 1. If the extension names a spreadsheet, the file is read as a spreadsheet
//!    and nothing else is tried.
//! 2. Otherwise, the file is read as a VCF if its header declares at least
//!    one `INFO` field.
//! 3. Otherwise, the file is read as a tab-delimited file if its first line
//!    has at least [`tab::MIN_COLUMNS`] columns.
//!
//! If no format matches, a [`FormatError`] is returned and no variants are
//! produced.
//!
//! Once built, a [`Variants`] is a one-shot iterator over [`Variant`]s. Records
//! are read one at a time from the underlying file, and the file is closed as
//! soon as the iterator is exhausted (or dropped).

pub mod builder;
pub mod format;
pub mod header;
pub mod spreadsheet;
pub mod tab;
pub mod vcf;

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::iter::FusedIterator;
use std::path::Path;
use std::path::PathBuf;

pub use builder::Builder;
use flate2::read::MultiGzDecoder;
pub use format::Format;
use tracing::debug;

use crate::Variant;

/// The new line character.
const NEW_LINE: char = '\n';

/// The carriage return character.
const CARRIAGE_RETURN: char = '\r';

/// The magic bytes that open a gzip (and, thus, a BGZF) stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

////////////////////////////////////////////////////////////////////////////////////////
// Errors
////////////////////////////////////////////////////////////////////////////////////////

/// An error where a file could not be recognized as any supported format.
#[derive(Debug)]
pub enum FormatError {
    /// The header of the file did not declare any `INFO` fields, so it was not
    /// considered a VCF.
    NoVcfMetadata,

    /// The first line of the file had too few tab-delimited columns.
    TooFewColumns {
        /// The number of columns that were found.
        found: usize,
    },

    /// The spreadsheet does not contain any worksheets.
    NoWorksheets,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::NoVcfMetadata => {
                write!(f, "no VCF metadata (INFO fields) found in the header")
            }
            FormatError::TooFewColumns { found } => write!(
                f,
                "not a tab-delimited file: expected at least {} columns on the first line, \
                 found {found} columns",
                tab::MIN_COLUMNS
            ),
            FormatError::NoWorksheets => write!(f, "the spreadsheet has no worksheets"),
        }
    }
}

impl std::error::Error for FormatError {}

/// An error related to the parsing of a single variant.
#[derive(Debug)]
pub enum ParseError {
    /// A tab-delimited line did not have a position column.
    MissingPosition {
        /// The line number (1-based).
        line: usize,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MissingPosition { line } => {
                write!(f, "missing position column: line {line}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// An error related to [`Variants`].
#[derive(Debug)]
pub enum Error {
    /// An I/O error.
    Io(io::Error),

    /// The file did not match any supported format.
    Format(FormatError),

    /// A variant could not be parsed.
    Parse(ParseError),

    /// An error reading a VCF record.
    Vcf(io::Error),

    /// An error reading a spreadsheet.
    Spreadsheet(calamine::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err) => write!(f, "i/o error: {err}"),
            Error::Format(err) => write!(f, "format error: {err}"),
            Error::Parse(err) => write!(f, "parse error: {err}"),
            Error::Vcf(err) => write!(f, "vcf error: {err}"),
            Error::Spreadsheet(err) => write!(f, "spreadsheet error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

////////////////////////////////////////////////////////////////////////////////////////
// Producers
////////////////////////////////////////////////////////////////////////////////////////

/// The producer bound to a [`Variants`] once its format is detected.
pub(crate) enum Producer {
    /// A VCF-backed producer.
    Vcf(vcf::Records),

    /// A tab-backed producer.
    Tab(tab::Records),

    /// A spreadsheet-backed producer.
    Spreadsheet(spreadsheet::Rows),
}

impl Producer {
    /// Gets the format this producer reads.
    fn format(&self) -> Format {
        match self {
            Producer::Vcf(_) => Format::Vcf,
            Producer::Tab(_) => Format::Tab,
            Producer::Spreadsheet(_) => Format::Spreadsheet,
        }
    }
}

impl Iterator for Producer {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Producer::Vcf(records) => records.next(),
            Producer::Tab(records) => records.next(),
            Producer::Spreadsheet(rows) => rows.next(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////
// Variants
////////////////////////////////////////////////////////////////////////////////////////

/// A lazy, forward-only source of [`Variant`]s read from a file.
pub struct Variants {
    /// The path to the file.
    path: PathBuf,

    /// The detected format.
    format: Format,

    /// The bound producer.
    ///
    /// This is dropped (closing the underlying file) as soon as the producer
    /// is exhausted.
    producer: Option<Producer>,
}

impl Variants {
    /// Creates a new [`Variants`] from a path using the default [`Builder`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use igvcontrol::Variants;
    ///
    /// for result in Variants::from_path("variants.vcf")? {
    ///     let variant = result?;
    ///     println!("{}", variant.locus());
    /// }
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Builder::default().try_build_from_path(path)
    }

    /// Creates a new [`Variants`] from an already-bound producer.
    pub(crate) fn new(path: PathBuf, producer: Producer) -> Self {
        Self {
            path,
            format: producer.format(),
            producer: Some(producer),
        }
    }

    /// Gets the path to the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the detected format of the file.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Whether or not the source has been exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.producer.is_none()
    }
}

impl std::fmt::Debug for Variants {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Variants")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("exhausted", &self.is_exhausted())
            .finish()
    }
}

impl Iterator for Variants {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        let producer = self.producer.as_mut()?;

        match producer.next() {
            Some(result) => Some(result),
            None => {
                debug!("{}: variants exhausted", self.path.display());
                self.producer = None;
                None
            }
        }
    }
}

impl FusedIterator for Variants {}

////////////////////////////////////////////////////////////////////////////////////////
// Helpers
////////////////////////////////////////////////////////////////////////////////////////

/// Opens a text file for buffered reading, transparently decompressing it if
/// it is gzipped (or BGZF-compressed).
pub(crate) fn open(path: &Path) -> io::Result<Box<dyn BufRead>> {
    let mut reader = BufReader::new(File::open(path)?);

    if reader.fill_buf()?.starts_with(&GZIP_MAGIC) {
        debug!("{}: detected gzip compression", path.display());
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

/// Reads the next line of `reader` into `buffer` without its line ending
/// (`\n` or `\r\n`).
///
/// Returns the number of bytes consumed, which is `0` only at the end of the
/// input.
pub(crate) fn read_line<T>(reader: &mut T, buffer: &mut String) -> io::Result<usize>
where
    T: BufRead + ?Sized,
{
    buffer.clear();
    let n = reader.read_line(buffer)?;

    if let Some(line) = buffer.strip_suffix(NEW_LINE) {
        let len = line.strip_suffix(CARRIAGE_RETURN).unwrap_or(line).len();
        buffer.truncate(len);
    }

    Ok(n)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write as _;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    #[test]
    fn test_read_line_trims_line_endings() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = b"chr1\t7571115\r\nchr1\t7572645\n\nchr1\t7573472";
        let mut reader = io::Cursor::new(&data[..]);
        let mut buffer = String::new();

        assert_eq!(read_line(&mut reader, &mut buffer)?, 14);
        assert_eq!(buffer, "chr1\t7571115");

        assert_eq!(read_line(&mut reader, &mut buffer)?, 13);
        assert_eq!(buffer, "chr1\t7572645");

        // A blank line is read, but is not the end of the file.
        assert_eq!(read_line(&mut reader, &mut buffer)?, 1);
        assert!(buffer.is_empty());

        // The final line needs no terminator.
        assert_eq!(read_line(&mut reader, &mut buffer)?, 12);
        assert_eq!(buffer, "chr1\t7573472");

        assert_eq!(read_line(&mut reader, &mut buffer)?, 0);
        assert!(buffer.is_empty());

        Ok(())
    }

    #[test]
    fn test_open_decompresses_gzip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"chr1\t100\n")?;
        file.write_all(&encoder.finish()?)?;
        file.flush()?;

        let mut reader = open(file.path())?;
        let mut buffer = String::new();
        read_line(&mut reader, &mut buffer)?;
        assert_eq!(buffer, "chr1\t100");

        Ok(())
    }

    #[test]
    fn test_format_error_display() {
        let err = Error::Format(FormatError::TooFewColumns { found: 3 });
        assert_eq!(
            err.to_string(),
            "format error: not a tab-delimited file: expected at least 5 columns on the first \
             line, found 3 columns"
        );
    }
}
