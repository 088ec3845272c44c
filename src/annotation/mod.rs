//! Per-image annotation records for licence-plate detection.
//!
//! An annotation file is one JSON document per image. Parsing turns it into
//! an [`AnnotationRecord`] and classifies it against the training inclusion
//! policy, see [`ParseOutcome`].

mod model;
pub mod parse;
mod polygon;

pub use model::{Annotation, AnnotationRecord, LicensePlateAnnotation, VehicleAnnotation};
pub use parse::{
    from_annotation_slice, from_annotation_str, read_annotation_file, ParseOutcome, RejectReason,
};
pub use polygon::{BoundingPolygon, Point, PolygonBounds};
