//! Dataset catalog: validated (annotation, image) pairs in discovery order.
//!
//! A [`Catalog`] is populated once by scanning a dataset root and is then
//! read-only. Trainers iterate it directly or take the
//! [`Subset::Train`]/[`Subset::Val`] slices of a [`TrainValSplit`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use lprindex::catalog::{Catalog, ScanOptions, Subset, DEFAULT_TRAIN_FRACTION};
//!
//! let catalog = Catalog::open(Path::new("/datasets/lpr"), &ScanOptions::default())?;
//! for sample in catalog.subset(Subset::Train, DEFAULT_TRAIN_FRACTION)? {
//!     let plates = sample.plate_polygons().count();
//!     println!("{} {}x{} {plates}", sample.image_path().display(), sample.width(), sample.height());
//! }
//! # Ok::<(), lprindex::LprIndexError>(())
//! ```

mod discover;
mod report;

pub use report::ScanReport;

use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::annotation::{read_annotation_file, AnnotationRecord, BoundingPolygon, ParseOutcome};
use crate::error::LprIndexError;

/// Share of samples that goes to training when the caller has no preference.
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Options for a directory scan.
#[derive(Clone, Debug)]
pub struct ScanOptions {
    /// Maximum number of samples to accept; 0 means unbounded.
    ///
    /// The scan stops as soon as the limit is hit, so a limited catalog is a
    /// prefix of the unlimited one.
    pub limit: usize,

    /// Follow symbolic links while walking the data directory.
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            limit: 0,
            follow_links: true,
        }
    }
}

impl ScanOptions {
    /// Sets the sample limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets whether symbolic links under the data directory are followed.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}

/// One validated annotation paired with its image on disk.
#[derive(Clone, Debug)]
pub struct DatasetSample {
    annotation_path: PathBuf,
    image_path: PathBuf,
    record: AnnotationRecord,
}

impl DatasetSample {
    pub fn annotation_path(&self) -> &Path {
        &self.annotation_path
    }

    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    pub fn record(&self) -> &AnnotationRecord {
        &self.record
    }

    /// Image width in pixels, as annotated.
    pub fn width(&self) -> u32 {
        self.record.width
    }

    /// Image height in pixels, as annotated.
    pub fn height(&self) -> u32 {
        self.record.height
    }

    /// Plate outlines, one per instance mask.
    pub fn plate_polygons(&self) -> impl Iterator<Item = &BoundingPolygon> {
        self.record.plate_polygons()
    }
}

/// Half-open index ranges of the training and validation subsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainValSplit {
    pub train: Range<usize>,
    pub val: Range<usize>,
}

impl TrainValSplit {
    /// Splits `len` samples at `floor(len * train_fraction)`.
    ///
    /// With one sample and a fraction below 1.0 the split point is 0, so the
    /// only sample lands in validation.
    ///
    /// # Errors
    /// Returns [`LprIndexError::InvalidSplitFraction`] unless the fraction is
    /// finite and within `[0.0, 1.0]`.
    pub fn new(len: usize, train_fraction: f64) -> Result<Self, LprIndexError> {
        if !(0.0..=1.0).contains(&train_fraction) {
            return Err(LprIndexError::InvalidSplitFraction(train_fraction));
        }

        let split = ((len as f64 * train_fraction).floor() as usize).min(len);
        Ok(Self {
            train: 0..split,
            val: split..len,
        })
    }

    /// The index range for `subset`.
    pub fn range(&self, subset: Subset) -> Range<usize> {
        match subset {
            Subset::Train => self.train.clone(),
            Subset::Val => self.val.clone(),
        }
    }
}

/// Which side of a train/validation split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subset {
    Train,
    Val,
}

impl FromStr for Subset {
    type Err = LprIndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Subset::Train),
            "val" => Ok(Subset::Val),
            other => Err(LprIndexError::UnknownSubset(other.to_string())),
        }
    }
}

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subset::Train => write!(f, "train"),
            Subset::Val => write!(f, "val"),
        }
    }
}

/// An ordered collection of validated samples from one dataset root.
#[derive(Debug, Default)]
pub struct Catalog {
    root: PathBuf,
    data_dir: PathBuf,
    image_dir: PathBuf,
    samples: Vec<DatasetSample>,
    report: ScanReport,
    open: bool,
}

impl Catalog {
    /// Creates an empty, closed catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog and scans `root` into it.
    pub fn open(root: &Path, opts: &ScanOptions) -> Result<Self, LprIndexError> {
        let mut catalog = Self::new();
        catalog.open_directory(root, opts)?;
        Ok(catalog)
    }

    /// Scans `<root>/data` and appends every valid, image-backed sample.
    ///
    /// Individual bad files are logged, counted in the returned report, and
    /// skipped.
    ///
    /// # Errors
    /// Returns [`LprIndexError::CatalogAlreadyOpen`] if the catalog has
    /// already been populated, and [`LprIndexError::DirectoryNotFound`] if
    /// `<root>/data` is not a directory.
    pub fn open_directory(
        &mut self,
        root: &Path,
        opts: &ScanOptions,
    ) -> Result<&ScanReport, LprIndexError> {
        if self.open {
            return Err(LprIndexError::CatalogAlreadyOpen {
                root: self.root.clone(),
            });
        }

        let data_dir = root.join(discover::DATA_DIR_NAME);
        if !data_dir.is_dir() {
            return Err(LprIndexError::DirectoryNotFound { path: data_dir });
        }

        self.root = root.to_path_buf();
        self.image_dir = root.join(discover::IMAGE_DIR_NAME);
        self.data_dir = data_dir;
        self.scan(opts);
        self.open = true;

        tracing::info!(
            root = %self.root.display(),
            accepted = self.report.accepted,
            skipped = self.report.skipped(),
            "dataset catalog opened"
        );

        Ok(&self.report)
    }

    /// Discards the current contents and scans `root` again.
    pub fn reopen(&mut self, root: &Path, opts: &ScanOptions) -> Result<&ScanReport, LprIndexError> {
        self.close();
        self.open_directory(root, opts)
    }

    /// Returns the catalog to its empty, closed state.
    pub fn close(&mut self) {
        *self = Self::new();
    }

    fn scan(&mut self, opts: &ScanOptions) {
        let mut entries = discover::annotation_files(&self.data_dir, opts.follow_links).peekable();
        while let Some(entry) = entries.next() {
            let annotation_path = match entry {
                Ok(path) => path,
                Err(error) => {
                    self.report.walk_errors += 1;
                    tracing::warn!(error = %error, "skipping unreadable directory entry");
                    continue;
                }
            };
            self.report.annotation_files += 1;

            let image_path =
                match discover::find_image(&self.data_dir, &self.image_dir, &annotation_path) {
                    Ok(path) => path,
                    Err(error) => {
                        self.report.missing_image += 1;
                        tracing::debug!(error = %error, "skipping annotation without image");
                        continue;
                    }
                };

            let outcome = match read_annotation_file(&annotation_path) {
                Ok(outcome) => outcome,
                Err(error) => {
                    if matches!(error, LprIndexError::Io(_)) {
                        self.report.unreadable += 1;
                    } else {
                        self.report.malformed += 1;
                    }
                    tracing::warn!(
                        path = %annotation_path.display(),
                        error = %error,
                        "skipping annotation file"
                    );
                    continue;
                }
            };

            match outcome {
                ParseOutcome::Accepted(record) => {
                    self.samples.push(DatasetSample {
                        annotation_path,
                        image_path,
                        record,
                    });
                    self.report.accepted += 1;
                }
                ParseOutcome::Rejected { reason, .. } => {
                    self.report.record_rejection(reason);
                    tracing::debug!(
                        path = %annotation_path.display(),
                        %reason,
                        "excluding annotation by policy"
                    );
                    continue;
                }
            }

            if opts.limit > 0 && self.samples.len() >= opts.limit {
                self.report.limit_reached = entries.peek().is_some();
                break;
            }
        }
    }

    /// Returns true once a scan has populated the catalog.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Counters from the last scan.
    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples, in discovery order.
    pub fn samples(&self) -> &[DatasetSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DatasetSample> {
        self.samples.iter()
    }

    pub fn get(&self, index: usize) -> Option<&DatasetSample> {
        self.samples.get(index)
    }

    /// Partitions sample indices into training and validation ranges.
    pub fn split_train_val(&self, train_fraction: f64) -> Result<TrainValSplit, LprIndexError> {
        TrainValSplit::new(self.samples.len(), train_fraction)
    }

    /// The samples of one side of the split.
    pub fn subset(
        &self,
        subset: Subset,
        train_fraction: f64,
    ) -> Result<&[DatasetSample], LprIndexError> {
        let split = self.split_train_val(train_fraction)?;
        Ok(&self.samples[split.range(subset)])
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a DatasetSample;
    type IntoIter = std::slice::Iter<'a, DatasetSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
