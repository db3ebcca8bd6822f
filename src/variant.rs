//! A single variant coordinate.

use std::io;
use std::str::FromStr;

/// The separator between the chromosome and the position within a locus.
pub const LOCUS_SEPARATOR: char = ':';

/// An error related to the parsing of a [`Variant`] from a locus.
#[derive(Debug)]
pub struct ParseVariantError(io::Error);

impl std::fmt::Display for ParseVariantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse variant error: {}", self.0)
    }
}

impl std::error::Error for ParseVariantError {}

/// A variant coordinate: a chromosome and a position.
///
/// The position is kept exactly as it was written in the source file. It is
/// never parsed into a number, so callers that need to compare positions
/// numerically must parse it themselves.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Variant {
    /// The chromosome.
    chromosome: String,

    /// The position (as written).
    position: String,
}

impl Variant {
    /// Creates a new [`Variant`].
    ///
    /// # Examples
    ///
    /// ```
    /// use igvcontrol::Variant;
    ///
    /// let variant = Variant::new("chr1", "7571115");
    /// assert_eq!(variant.chromosome(), "chr1");
    /// assert_eq!(variant.position(), "7571115");
    /// ```
    pub fn new(chromosome: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            chromosome: chromosome.into(),
            position: position.into(),
        }
    }

    /// Gets the chromosome.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the position.
    pub fn position(&self) -> &str {
        &self.position
    }

    /// Renders the variant as a locus suitable for a `goto` command.
    ///
    /// # Examples
    ///
    /// ```
    /// use igvcontrol::Variant;
    ///
    /// let variant = Variant::new("chr20", "14370");
    /// assert_eq!(variant.locus(), "chr20:14370");
    /// ```
    pub fn locus(&self) -> String {
        self.to_string()
    }

    /// Consumes self and returns the inner `(chromosome, position)` pair.
    pub fn into_parts(self) -> (String, String) {
        (self.chromosome, self.position)
    }
}

impl From<(String, String)> for Variant {
    fn from((chromosome, position): (String, String)) -> Self {
        Self {
            chromosome,
            position,
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.chromosome, LOCUS_SEPARATOR, self.position)
    }
}

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Chromosome names may themselves contain the separator (e.g., HLA
        // contigs), so the split happens on the last one.
        match s.rsplit_once(LOCUS_SEPARATOR) {
            Some((chromosome, position)) if !chromosome.is_empty() && !position.is_empty() => {
                Ok(Self::new(chromosome, position))
            }
            _ => Err(ParseVariantError(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{s} is not a valid locus"),
            ))),
        }
    }
}
