//! Matching same-named files across a reference and a comparison directory.
//!
//! The reference directory drives the iteration. Entries without a regular
//! file of the same name in the comparison directory are skipped without an
//! error. Order follows the reference directory listing and is not sorted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A reference/comparison file pair sharing one filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    /// Shared filename.
    pub name: String,
    /// Path in the reference directory.
    pub reference: PathBuf,
    /// Path in the comparison directory.
    pub comparison: PathBuf,
}

/// Lazy iterator over the [`ImagePair`]s of two directories.
///
/// # Example
///
/// ```ignore
/// use pair_eval::pairs::PairMatcher;
///
/// for pair in PairMatcher::new("ref", "distorted")? {
///     let pair = pair?;
///     println!("{}", pair.name);
/// }
/// ```
#[derive(Debug)]
pub struct PairMatcher {
    reference_dir: PathBuf,
    comparison_dir: PathBuf,
    entries: fs::ReadDir,
}

impl PairMatcher {
    /// Open the reference listing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DirectoryAccess`] if either directory is missing, or
    /// the reference directory cannot be listed.
    pub fn new(reference_dir: impl Into<PathBuf>, comparison_dir: impl Into<PathBuf>) -> Result<Self> {
        let reference_dir = reference_dir.into();
        let comparison_dir = comparison_dir.into();

        check_directory(&reference_dir)?;
        check_directory(&comparison_dir)?;

        let entries =
            fs::read_dir(&reference_dir).map_err(|e| Error::directory_access(&reference_dir, e))?;

        Ok(Self {
            reference_dir,
            comparison_dir,
            entries,
        })
    }

    /// The reference directory.
    #[must_use]
    pub fn reference_dir(&self) -> &Path {
        &self.reference_dir
    }

    /// The comparison directory.
    #[must_use]
    pub fn comparison_dir(&self) -> &Path {
        &self.comparison_dir
    }
}

impl Iterator for PairMatcher {
    type Item = Result<ImagePair>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(Error::directory_access(&self.reference_dir, e))),
            };

            let reference = entry.path();
            if !reference.is_file() {
                continue;
            }

            let comparison = self.comparison_dir.join(entry.file_name());
            if !comparison.is_file() {
                continue;
            }

            return Some(Ok(ImagePair {
                name: entry.file_name().to_string_lossy().into_owned(),
                reference,
                comparison,
            }));
        }
    }
}

/// Collect every pair of two directories.
pub fn match_pairs(reference_dir: &Path, comparison_dir: &Path) -> Result<Vec<ImagePair>> {
    PairMatcher::new(reference_dir, comparison_dir)?.collect()
}

fn check_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::directory_access(path, "path does not exist"));
    }
    if !path.is_dir() {
        return Err(Error::directory_access(path, "path is not a directory"));
    }
    Ok(())
}
