#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// Builds a `<root>/data` + `<root>/images` dataset tree inside a temp dir.
pub struct DatasetFixture {
    pub temp: tempfile::TempDir,
}

impl DatasetFixture {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(temp.path().join("data")).expect("create data dir");
        fs::create_dir_all(temp.path().join("images")).expect("create images dir");
        Self { temp }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Writes `data/<rel>.json`.
    pub fn annotation(&self, rel: &str, doc: &Value) -> PathBuf {
        let path = self.root().join("data").join(format!("{rel}.json"));
        write_file(&path, doc.to_string().as_bytes());
        path
    }

    /// Writes `data/<rel>.json` with raw, possibly invalid, contents.
    pub fn raw_annotation(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join("data").join(format!("{rel}.json"));
        write_file(&path, contents.as_bytes());
        path
    }

    /// Writes `images/<rel>.<ext>`.
    pub fn image(&self, rel: &str, ext: &str) -> PathBuf {
        let path = self.root().join("images").join(format!("{rel}.{ext}"));
        write_file(&path, b"\xFF\xD8\xFF");
        path
    }

    /// Writes a plain, valid annotation plus its `.jpg`.
    pub fn sample(&self, rel: &str) -> PathBuf {
        self.annotation(rel, &record(rel, 1));
        self.image(rel, "jpg")
    }
}

/// A valid record named after `id` with `plates` four-point plates.
pub fn record(id: &str, plates: usize) -> Value {
    let annotations: Vec<Value> = (0..plates)
        .map(|i| {
            let x = 10.0 * i as f64;
            json!({
                "name": "license_plate",
                "country": "US",
                "value": format!("PLATE{i}"),
                "box": [[x, 0.0], [x + 8.0, 0.0], [x + 8.0, 4.0], [x, 4.0]]
            })
        })
        .collect();

    json!({
        "id": id,
        "width": 640,
        "height": 480,
        "file_name": format!("{id}.jpg"),
        "annotations": annotations
    })
}

/// `record` with an extra top-level field.
pub fn record_with(id: &str, key: &str, value: Value) -> Value {
    let mut doc = record(id, 1);
    doc.as_object_mut()
        .expect("record is an object")
        .insert(key.to_string(), value);
    doc
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write fixture file");
}
