//! Scan report: what a directory scan kept and why it skipped the rest.
//!
//! A scan never aborts on a single bad file, so these counters are the only
//! record of how much of the export actually made it into the catalog.

use serde::Serialize;
use std::fmt;

use crate::annotation::RejectReason;

/// Counters collected while populating a catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// `.json` files visited under the data directory.
    pub annotation_files: usize,
    /// Samples appended to the catalog.
    pub accepted: usize,
    /// Annotation files with no `.jpg`/`.png` counterpart.
    pub missing_image: usize,
    /// Annotation files that could not be opened.
    pub unreadable: usize,
    /// Annotation files with invalid JSON or missing required fields.
    pub malformed: usize,
    /// Records excluded as `hard` or `impossible`.
    pub rejected_difficulty: usize,
    /// Records excluded as plate-only crops.
    pub rejected_plate_only: usize,
    /// Directory entries the walker failed to read.
    pub walk_errors: usize,
    /// True when the scan stopped at the sample limit with annotation files
    /// still unvisited.
    pub limit_reached: bool,
}

impl ScanReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a policy rejection under its reason.
    pub fn record_rejection(&mut self, reason: RejectReason) {
        if reason.is_difficulty() {
            self.rejected_difficulty += 1;
        } else {
            self.rejected_plate_only += 1;
        }
    }

    /// Total number of visited annotation files that did not become samples.
    pub fn skipped(&self) -> usize {
        self.missing_image
            + self.unreadable
            + self.malformed
            + self.rejected_difficulty
            + self.rejected_plate_only
    }

    /// Returns true if every visited annotation file became a sample.
    pub fn is_clean(&self) -> bool {
        self.skipped() == 0 && self.walk_errors == 0
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Scanned {} annotation file(s): {} accepted, {} skipped",
            self.annotation_files,
            self.accepted,
            self.skipped()
        )?;

        if self.limit_reached {
            writeln!(f, "  stopped early: sample limit reached")?;
        }

        let rows = [
            ("missing image", self.missing_image),
            ("unreadable", self.unreadable),
            ("malformed", self.malformed),
            ("hard/impossible", self.rejected_difficulty),
            ("plate only", self.rejected_plate_only),
            ("walk errors", self.walk_errors),
        ];
        for (label, count) in rows {
            if count > 0 {
                writeln!(f, "  {label}: {count}")?;
            }
        }

        Ok(())
    }
}
