//! Header row detection for tab-delimited files and spreadsheets.
//!
//! Neither format marks its header explicitly, so the first row is treated as
//! a header when any of its fields contains one of the [`KEYWORDS`] (compared
//! case-insensitively). This is an approximation: a first data row that
//! happens to contain one of the keywords anywhere (e.g., a gene named
//! `PREF1` contains `ref`) is taken for a header and dropped.

/// The keywords that mark a row as a header.
pub const KEYWORDS: &[&str] = &["start", "end", "alt", "ref"];

/// Returns whether a row with the given fields looks like a header.
///
/// # Examples
///
/// ```
/// use igvcontrol::variants::header;
///
/// assert!(header::is_header("Chrom\tStart\tEnd".split('\t')));
/// assert!(!header::is_header("chr1\t7571115\t7571115".split('\t')));
/// ```
pub fn is_header<'a, I>(fields: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    fields.into_iter().any(|field| {
        let field = field.to_lowercase();
        KEYWORDS.iter().any(|keyword| field.contains(keyword))
    })
}
