//! VCF variant files.

use std::io::BufRead;
use std::path::Path;

use noodles::vcf;
use tracing::debug;
use tracing::trace;

use crate::Variant;
use crate::variants;
use crate::variants::Error;
use crate::variants::FormatError;
use crate::variants::Producer;
use crate::variants::Result;
use crate::variants::format::Detection;

/// The prefix prepended to chromosome names.
pub const CHR_PREFIX: &str = "chr";

/// The position written for a record at a telomere.
const TELOMERE: &str = "0";

/// Detects whether the file at `path` is a VCF.
///
/// A file is considered a VCF when its header can be read and declares at
/// least one `INFO` field.
pub(crate) fn detect(path: &Path, prepend_chr: bool) -> Result<Detection> {
    let mut reader = variants::open(path)
        .map(vcf::io::Reader::new)
        .map_err(Error::Io)?;

    let header = match reader.read_header() {
        Ok(header) => header,
        Err(err) => {
            debug!("{}: unreadable VCF header: {err}", path.display());
            return Ok(Detection::Rejected(FormatError::NoVcfMetadata));
        }
    };

    if header.infos().is_empty() {
        return Ok(Detection::Rejected(FormatError::NoVcfMetadata));
    }

    Ok(Detection::Bound(Producer::Vcf(Records::new(
        reader,
        prepend_chr,
    ))))
}

/// Normalizes a chromosome name.
///
/// When `prepend_chr` is set, [`CHR_PREFIX`] is prepended to names that do not
/// already start with it.
///
/// # Examples
///
/// ```
/// use igvcontrol::variants::vcf::normalize_chromosome;
///
/// assert_eq!(normalize_chromosome("20", true), "chr20");
/// assert_eq!(normalize_chromosome("chr20", true), "chr20");
/// assert_eq!(normalize_chromosome("20", false), "20");
/// ```
pub fn normalize_chromosome(name: &str, prepend_chr: bool) -> String {
    if prepend_chr && !name.starts_with(CHR_PREFIX) {
        format!("{CHR_PREFIX}{name}")
    } else {
        name.to_string()
    }
}

/// An iterator over the variants in a VCF.
pub struct Records {
    /// The underlying reader (positioned after the header).
    reader: vcf::io::Reader<Box<dyn BufRead>>,

    /// The record buffer.
    record: vcf::Record,

    /// Whether or not to prepend `chr` to chromosome names.
    prepend_chr: bool,

    /// The number of records read so far.
    record_no: usize,
}

impl Records {
    /// Creates a new [`Records`] from a reader whose header has been read.
    pub(crate) fn new(reader: vcf::io::Reader<Box<dyn BufRead>>, prepend_chr: bool) -> Self {
        Self {
            reader,
            record: vcf::Record::default(),
            prepend_chr,
            record_no: 0,
        }
    }
}

impl std::fmt::Debug for Records {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records")
            .field("prepend_chr", &self.prepend_chr)
            .field("record_no", &self.record_no)
            .finish()
    }
}

impl Iterator for Records {
    type Item = Result<Variant>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(0) => return None,
            Ok(_) => {}
            Err(err) => return Some(Err(Error::Vcf(err))),
        }

        self.record_no += 1;

        // A position of 0 (a telomere) has no 1-based start.
        let position = match self.record.variant_start() {
            Some(Ok(position)) => position.to_string(),
            Some(Err(err)) => return Some(Err(Error::Vcf(err))),
            None => {
                trace!("record {}: telomeric position", self.record_no);
                String::from(TELOMERE)
            }
        };

        let chromosome =
            normalize_chromosome(self.record.reference_sequence_name(), self.prepend_chr);

        Some(Ok(Variant::new(chromosome, position)))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    const VCF: &str = "\
##fileformat=VCFv4.0
##INFO=<ID=NS,Number=1,Type=Integer,Description=\"Number of Samples With Data\">
##INFO=<ID=DP,Number=1,Type=Integer,Description=\"Total Depth\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
20\t14370\trs6054257\tG\tA\t29\tPASS\tNS=3;DP=14
chr20\t17330\t.\tT\tA\t3\tq10\tNS=3;DP=11
";

    fn bound(data: &str, prepend_chr: bool) -> Records {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(data.as_bytes()).unwrap();
        file.flush().unwrap();

        match detect(file.path(), prepend_chr).unwrap() {
            Detection::Bound(Producer::Vcf(records)) => records,
            _ => panic!("expected a VCF producer"),
        }
    }

    #[test]
    fn test_records() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variants = bound(VCF, true).collect::<Result<Vec<_>>>()?;

        assert_eq!(
            variants,
            vec![
                Variant::new("chr20", "14370"),
                Variant::new("chr20", "17330"),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_telomeric_record() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let data = VCF.replace("20\t14370\t", "20\t0\t");
        let variants = bound(&data, true).collect::<Result<Vec<_>>>()?;

        assert_eq!(
            variants,
            vec![Variant::new("chr20", "0"), Variant::new("chr20", "17330")]
        );

        Ok(())
    }

    #[test]
    fn test_records_without_prefix() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let variants = bound(VCF, false).collect::<Result<Vec<_>>>()?;

        assert_eq!(variants[0], Variant::new("20", "14370"));
        assert_eq!(variants[1], Variant::new("chr20", "17330"));

        Ok(())
    }

    #[test]
    fn test_header_without_infos_is_rejected() -> std::result::Result<(), Box<dyn std::error::Error>>
    {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            "##fileformat=VCFv4.0\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n\
             20\t14370\t.\tG\tA\t29\tPASS\t.\n"
        )?;
        file.flush()?;

        assert!(matches!(
            detect(file.path(), true)?,
            Detection::Rejected(FormatError::NoVcfMetadata)
        ));

        Ok(())
    }

    #[test]
    fn test_tab_file_is_rejected() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "chrom\tstart\tend\tref\talt\nchr1\t1\t1\tA\tG\n")?;
        file.flush()?;

        assert!(matches!(
            detect(file.path(), true)?,
            Detection::Rejected(FormatError::NoVcfMetadata)
        ));

        Ok(())
    }
}
