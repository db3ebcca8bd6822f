//! A builder for [`Variants`].

use std::path::Path;

use tracing::debug;

use crate::variants::Error;
use crate::variants::Result;
use crate::variants::Variants;
use crate::variants::format::Detection;
use crate::variants::format::Detector;

/// A builder for [`Variants`].
#[derive(Clone, Debug)]
pub struct Builder {
    /// Whether or not to prepend `chr` to VCF chromosome names.
    prepend_chr: bool,
}

impl Builder {
    /// Sets whether or not the `chr` prefix is prepended to chromosome names
    /// read from a VCF.
    ///
    /// Unlike a plain prepend, names that already carry the prefix are left as
    /// is, so `chr20` stays `chr20` rather than becoming `chrchr20`.
    ///
    /// This is enabled by default.
    ///
    /// # Examples
    ///
    /// ```
    /// use igvcontrol::variants::Builder;
    ///
    /// let builder = Builder::default().prepend_chr(false);
    /// assert!(!builder.prepends_chr());
    /// ```
    pub fn prepend_chr(mut self, value: bool) -> Self {
        self.prepend_chr = value;
        self
    }

    /// Gets whether or not the `chr` prefix is prepended to VCF chromosome
    /// names.
    pub fn prepends_chr(&self) -> bool {
        self.prepend_chr
    }

    /// Detects the format of the file at `path` and binds a [`Variants`] to
    /// it.
    ///
    /// The detectors returned by [`Detector::priority()`] are tried in order
    /// and the first one that recognizes the file wins. If none do, the
    /// rejection from the last detector is returned as an
    /// [`Error::Format`](crate::variants::Error::Format).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use igvcontrol::variants::Builder;
    ///
    /// let variants = Builder::default()
    ///     .prepend_chr(false)
    ///     .try_build_from_path("variants.vcf.gz")?;
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build_from_path(&self, path: impl AsRef<Path>) -> Result<Variants> {
        let path = path.as_ref();
        let mut rejection = None;

        for detector in Detector::priority(path) {
            match detector.detect(path, self)? {
                Detection::Bound(producer) => {
                    debug!("{}: detected {} format", path.display(), detector.format());
                    return Ok(Variants::new(path.to_path_buf(), producer));
                }
                Detection::Rejected(err) => {
                    debug!("{}: not {} format: {err}", path.display(), detector.format());
                    rejection = Some(err);
                }
            }
        }

        // SAFETY: every priority list holds at least one detector, and each
        // detector either binds (returning above) or rejects.
        Err(Error::Format(rejection.unwrap()))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self { prepend_chr: true }
    }
}
