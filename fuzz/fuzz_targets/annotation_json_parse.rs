//! Fuzz target for annotation JSON parsing.
//!
//! Run with:
//!   cargo +nightly fuzz run annotation_json_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use lprindex::annotation::from_annotation_slice;

fuzz_target!(|data: &[u8]| {
    // Annotation files are a few KB; cap input to avoid OOM.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(outcome) = from_annotation_slice(data) {
        for polygon in outcome.record().plate_polygons() {
            assert_eq!(polygon.xs().len(), polygon.ys().len());
            let _ = polygon.bounds();
        }
    }
});
