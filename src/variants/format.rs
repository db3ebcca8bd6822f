//! Formats of variant files and their detection.

use std::path::Path;

use crate::variants::Builder;
use crate::variants::Error;
use crate::variants::FormatError;
use crate::variants::Producer;
use crate::variants::Result;
use crate::variants::spreadsheet;
use crate::variants::tab;
use crate::variants::vcf;

/// The format of a variant file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// A VCF file.
    Vcf,

    /// A tab-delimited file.
    Tab,

    /// A spreadsheet (`.xls`, `.xlsx`, and friends).
    Spreadsheet,

    /// A file that matched none of the supported formats.
    Unknown,
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Vcf => write!(f, "vcf"),
            Format::Tab => write!(f, "tab"),
            Format::Spreadsheet => write!(f, "spreadsheet"),
            Format::Unknown => write!(f, "unknown"),
        }
    }
}

/// The outcome of running a [`Detector`] against a file.
pub(crate) enum Detection {
    /// The file is in the detector's format and a producer is bound to it.
    Bound(Producer),

    /// The file is not in the detector's format.
    Rejected(FormatError),
}

/// A format detector.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Detector {
    /// Detects spreadsheets.
    Spreadsheet,

    /// Detects VCF files.
    Vcf,

    /// Detects tab-delimited files.
    Tab,
}

/// Detectors tried when the extension names a spreadsheet.
const BY_EXTENSION: &[Detector] = &[Detector::Spreadsheet];

/// Detectors tried for everything else, in order.
const BY_CONTENT: &[Detector] = &[Detector::Vcf, Detector::Tab];

impl Detector {
    /// Gets the detectors to try for `path`, in priority order.
    ///
    /// A spreadsheet is never probed as a VCF or a tab-delimited file.
    ///
    /// # Examples
    ///
    /// ```
    /// use igvcontrol::variants::format::Detector;
    ///
    /// assert_eq!(Detector::priority("a.xlsx".as_ref()), &[Detector::Spreadsheet]);
    /// assert_eq!(
    ///     Detector::priority("a.vcf".as_ref()),
    ///     &[Detector::Vcf, Detector::Tab]
    /// );
    /// ```
    pub fn priority(path: &Path) -> &'static [Detector] {
        if spreadsheet::has_spreadsheet_extension(path) {
            BY_EXTENSION
        } else {
            BY_CONTENT
        }
    }

    /// Gets the format this detector recognizes.
    pub fn format(&self) -> Format {
        match self {
            Detector::Spreadsheet => Format::Spreadsheet,
            Detector::Vcf => Format::Vcf,
            Detector::Tab => Format::Tab,
        }
    }

    /// Runs the detector against the file at `path`.
    ///
    /// Failing to read the file at all is an error; failing to recognize it is
    /// a [`Detection::Rejected`].
    pub(crate) fn detect(&self, path: &Path, builder: &Builder) -> Result<Detection> {
        match self {
            Detector::Spreadsheet => spreadsheet::detect(path),
            Detector::Vcf => vcf::detect(path, builder.prepends_chr()),
            Detector::Tab => tab::detect(path),
        }
    }
}

/// Detects the format of the file at `path` without keeping a producer bound
/// to it.
///
/// [`Format::Unknown`] is returned when the file matches no supported format.
/// Errors reading the file are still returned as errors.
pub fn sniff(path: impl AsRef<Path>) -> Result<Format> {
    match Builder::default().try_build_from_path(path) {
        Ok(variants) => Ok(variants.format()),
        Err(Error::Format(_)) => Ok(Format::Unknown),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn test_format_display() {
        assert_eq!(Format::Vcf.to_string(), "vcf");
        assert_eq!(Format::Tab.to_string(), "tab");
        assert_eq!(Format::Spreadsheet.to_string(), "spreadsheet");
        assert_eq!(Format::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_priority() {
        for name in ["a.xls", "a.xlsx", "A.XLSX", "a.ods"] {
            assert_eq!(Detector::priority(Path::new(name)), BY_EXTENSION);
        }

        for name in ["a.vcf", "a.tab", "a.vcf.gz", "a", "xlsx"] {
            assert_eq!(Detector::priority(Path::new(name)), BY_CONTENT);
        }
    }

    #[test]
    fn test_sniff_unknown() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "chr1\t100")?;
        file.flush()?;

        assert_eq!(sniff(file.path())?, Format::Unknown);
        Ok(())
    }

    #[test]
    fn test_sniff_missing_file() {
        let err = sniff("/this/path/does/not/exist.tab").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
