//! Annotation JSON reader.
//!
//! Each annotation file describes one image:
//!
//! ```json
//! {
//!   "id": "0001", "width": 1920, "height": 1080, "file_name": "0001.jpg",
//!   "difficulty": "easy",
//!   "annotations": [
//!     { "name": "license_plate", "country": "US", "region": "CA",
//!       "value": "7ABC123", "box": [[10, 20], [50, 20], [50, 40], [10, 40]] }
//!   ]
//! }
//! ```
//!
//! `id`, `width`, `height` and `file_name` are structurally required; a file
//! without them is malformed. Everything else is optional. Samples marked
//! `hard`/`impossible`, or whose `info` mentions `plate_only`, parse
//! successfully but come back as [`ParseOutcome::Rejected`].

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::model::{Annotation, AnnotationRecord, LicensePlateAnnotation, VehicleAnnotation};
use super::polygon::{BoundingPolygon, Point};
use crate::error::LprIndexError;

const LICENSE_PLATE_NAME: &str = "license_plate";
const VEHICLE_NAME: &str = "vehicle";
const PLATE_ONLY_MARKER: &str = "plate_only";

// ============================================================================
// Raw schema (internal to this module)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: String,
    width: u32,
    height: u32,
    file_name: String,

    #[serde(default)]
    difficulty: Option<Value>,

    #[serde(default)]
    info: Option<Value>,

    /// Kept untyped: a bad entry must not sink the whole record.
    #[serde(default)]
    annotations: Option<Value>,
}

// ============================================================================
// Outcome types
// ============================================================================

/// Why a structurally sound record is excluded from training.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// `difficulty`/`info` is `hard`.
    HardDifficulty,
    /// `difficulty`/`info` is `impossible`.
    ImpossibleDifficulty,
    /// `info` contains `plate_only` (ASCII case-insensitive): a plate crop
    /// without scene context.
    PlateOnly,
}

impl RejectReason {
    /// Returns true for the difficulty-based reasons.
    pub fn is_difficulty(&self) -> bool {
        matches!(
            self,
            RejectReason::HardDifficulty | RejectReason::ImpossibleDifficulty
        )
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::HardDifficulty => write!(f, "difficulty marked hard"),
            RejectReason::ImpossibleDifficulty => write!(f, "difficulty marked impossible"),
            RejectReason::PlateOnly => write!(f, "plate-only sample"),
        }
    }
}

/// Result of parsing one well-formed annotation file.
///
/// Rejected records keep every field that was parsed, for diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseOutcome {
    Accepted(AnnotationRecord),
    Rejected {
        record: AnnotationRecord,
        reason: RejectReason,
    },
}

impl ParseOutcome {
    /// Returns true if the record passed every exclusion filter.
    pub fn is_valid(&self) -> bool {
        matches!(self, ParseOutcome::Accepted(_))
    }

    pub fn record(&self) -> &AnnotationRecord {
        match self {
            ParseOutcome::Accepted(record) => record,
            ParseOutcome::Rejected { record, .. } => record,
        }
    }

    pub fn into_record(self) -> AnnotationRecord {
        match self {
            ParseOutcome::Accepted(record) => record,
            ParseOutcome::Rejected { record, .. } => record,
        }
    }

    pub fn reject_reason(&self) -> Option<RejectReason> {
        match self {
            ParseOutcome::Accepted(_) => None,
            ParseOutcome::Rejected { reason, .. } => Some(*reason),
        }
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// Reads and classifies one annotation file.
///
/// # Errors
/// Returns [`LprIndexError::Io`] if the file cannot be opened and
/// [`LprIndexError::MalformedAnnotation`] if it is not valid JSON or lacks a
/// required field.
pub fn read_annotation_file(path: &Path) -> Result<ParseOutcome, LprIndexError> {
    let file = File::open(path).map_err(LprIndexError::Io)?;
    let reader = BufReader::new(file);

    let raw: RawRecord =
        serde_json::from_reader(reader).map_err(|source| LprIndexError::malformed(path, source))?;
    Ok(classify(raw))
}

/// Parses an annotation document from a string.
///
/// Useful for testing without file I/O.
pub fn from_annotation_str(json: &str) -> Result<ParseOutcome, LprIndexError> {
    let raw: RawRecord = serde_json::from_str(json)
        .map_err(|source| LprIndexError::malformed(PathBuf::from("<memory>"), source))?;
    Ok(classify(raw))
}

/// Parses an annotation document from bytes.
///
/// Useful for fuzzing and benchmarks.
pub fn from_annotation_slice(bytes: &[u8]) -> Result<ParseOutcome, LprIndexError> {
    let raw: RawRecord = serde_json::from_slice(bytes)
        .map_err(|source| LprIndexError::malformed(PathBuf::from("<memory>"), source))?;
    Ok(classify(raw))
}

// ============================================================================
// Conversion and policy
// ============================================================================

fn classify(raw: RawRecord) -> ParseOutcome {
    let reason = reject_reason(raw.difficulty.as_ref(), raw.info.as_ref());
    let record = build_record(raw);

    match reason {
        Some(reason) => ParseOutcome::Rejected { record, reason },
        None => ParseOutcome::Accepted(record),
    }
}

fn build_record(raw: RawRecord) -> AnnotationRecord {
    let mut record = AnnotationRecord::new(raw.id, raw.width, raw.height, raw.file_name);

    let entries = match &raw.annotations {
        Some(Value::Array(entries)) => entries.as_slice(),
        _ => &[],
    };

    for entry in entries {
        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            continue;
        };

        match name {
            LICENSE_PLATE_NAME => {
                if let Some(plate) = license_plate(entry) {
                    record.annotations.push(Annotation::LicensePlate(plate));
                }
            }
            VEHICLE_NAME => record.annotations.push(Annotation::Vehicle(vehicle(entry))),
            _ => {}
        }
    }

    record
}

/// Plates without usable geometry carry no signal and are dropped.
fn license_plate(entry: &Value) -> Option<LicensePlateAnnotation> {
    let polygon = polygon(entry.get("box"))?;

    Some(LicensePlateAnnotation {
        country: text_field(entry, "country"),
        region: text_field(entry, "region"),
        value: text_field(entry, "value"),
        info: text_field(entry, "info"),
        polygon,
    })
}

fn vehicle(entry: &Value) -> VehicleAnnotation {
    VehicleAnnotation {
        make: text_field(entry, "make"),
        model: text_field(entry, "model"),
        year: text_field(entry, "year"),
        polygon: polygon(entry.get("box")),
    }
}

/// `None` unless `value` is a non-empty list of numeric `[x, y]` pairs.
fn polygon(value: Option<&Value>) -> Option<BoundingPolygon> {
    let points = value?
        .as_array()?
        .iter()
        .map(|pair| match pair.as_array()?.as_slice() {
            [x, y] => Some(Point::new(x.as_f64()?, y.as_f64()?)),
            _ => None,
        })
        .collect::<Option<Vec<Point>>>()?;
    BoundingPolygon::new(points)
}

/// String or number attribute, empty when absent or of another type.
fn text_field(entry: &Value, key: &str) -> String {
    entry.get(key).and_then(scalar_text).unwrap_or_default()
}

/// Difficulty markers win over `plate_only`.
fn reject_reason(difficulty: Option<&Value>, info: Option<&Value>) -> Option<RejectReason> {
    for text in [difficulty, info].into_iter().flatten().flat_map(marker_texts) {
        let text = text.trim();
        if text.eq_ignore_ascii_case("hard") {
            return Some(RejectReason::HardDifficulty);
        }
        if text.eq_ignore_ascii_case("impossible") {
            return Some(RejectReason::ImpossibleDifficulty);
        }
    }

    if info
        .into_iter()
        .flat_map(marker_texts)
        .any(|text| text.to_ascii_lowercase().contains(PLATE_ONLY_MARKER))
    {
        return Some(RejectReason::PlateOnly);
    }

    None
}

/// Marker fields are a string or a list of strings; anything else is ignored.
fn marker_texts(value: &Value) -> Vec<&str> {
    match value {
        Value::String(text) => vec![text.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
