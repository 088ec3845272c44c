//! Parsed annotation records.
//!
//! One [`AnnotationRecord`] describes one source image. Its objects are a
//! tagged union, so consumers match on [`Annotation`] instead of checking a
//! type field.

use serde::Serialize;

use super::polygon::BoundingPolygon;

/// One licence plate within an image.
///
/// Only constructed with geometry: plate entries without a polygon are
/// dropped by the parser.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LicensePlateAnnotation {
    /// Issuing country, empty when not annotated.
    pub country: String,

    /// Issuing region or state, empty when not annotated.
    pub region: String,

    /// Plate text, empty when not annotated.
    pub value: String,

    /// Free-form per-plate note, empty when not annotated.
    pub info: String,

    /// Plate outline in pixel coordinates.
    pub polygon: BoundingPolygon,
}

impl LicensePlateAnnotation {
    /// Creates a plate with empty attributes.
    pub fn new(polygon: BoundingPolygon) -> Self {
        Self {
            country: String::new(),
            region: String::new(),
            value: String::new(),
            info: String::new(),
            polygon,
        }
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// A vehicle within an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VehicleAnnotation {
    pub make: String,
    pub model: String,
    pub year: String,

    /// Vehicle outline, when the annotator drew one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<BoundingPolygon>,
}

/// An object annotated within an image.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Annotation {
    LicensePlate(LicensePlateAnnotation),
    Vehicle(VehicleAnnotation),
}

/// The full annotation set of one source image.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnnotationRecord {
    /// Unique identifier of the image.
    pub id: String,

    /// Width of the image in pixels.
    pub width: u32,

    /// Height of the image in pixels.
    pub height: u32,

    /// File name the annotation refers to.
    pub file_name: String,

    /// Objects in annotation order.
    pub annotations: Vec<Annotation>,
}

impl AnnotationRecord {
    /// Creates a record without annotations.
    pub fn new(
        id: impl Into<String>,
        width: u32,
        height: u32,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            file_name: file_name.into(),
            annotations: Vec::new(),
        }
    }

    /// Iterates over the licence plates, in annotation order.
    pub fn license_plates(&self) -> impl Iterator<Item = &LicensePlateAnnotation> {
        self.annotations.iter().filter_map(|ann| match ann {
            Annotation::LicensePlate(plate) => Some(plate),
            Annotation::Vehicle(_) => None,
        })
    }

    /// Iterates over the vehicles, in annotation order.
    pub fn vehicles(&self) -> impl Iterator<Item = &VehicleAnnotation> {
        self.annotations.iter().filter_map(|ann| match ann {
            Annotation::Vehicle(vehicle) => Some(vehicle),
            Annotation::LicensePlate(_) => None,
        })
    }

    /// Plate outlines to rasterize into instance masks.
    pub fn plate_polygons(&self) -> impl Iterator<Item = &BoundingPolygon> {
        self.license_plates().map(|plate| &plate.polygon)
    }
}
