//! Annotation discovery and image pairing.
//!
//! Layout:
//!
//! ```text
//! <root>/data/**/<name>.json
//! <root>/images/**/<name>.jpg|png
//! ```
//!
//! The image tree mirrors the data tree: an annotation at
//! `data/a/b/x.json` pairs with `images/a/b/x.jpg`, or `images/a/b/x.png`
//! when there is no JPEG.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::LprIndexError;

pub(crate) const DATA_DIR_NAME: &str = "data";
pub(crate) const IMAGE_DIR_NAME: &str = "images";

const ANNOTATION_EXTENSION: &str = "json";

/// Tried in order.
const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// Lazily walks `data_dir` for annotation files.
///
/// Entries are sorted by file name within each directory, so the order is
/// the same on every run over the same tree. Walk failures are yielded
/// rather than ending the iteration.
pub(crate) fn annotation_files(
    data_dir: &Path,
    follow_links: bool,
) -> impl Iterator<Item = Result<PathBuf, walkdir::Error>> {
    WalkDir::new(data_dir)
        .follow_links(follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() && is_annotation_file(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(error) => Some(Err(error)),
        })
}

fn is_annotation_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(ANNOTATION_EXTENSION))
}

/// Finds the image mirroring `annotation_path` under `image_dir`.
///
/// # Errors
/// Returns [`LprIndexError::MissingImage`] when neither a `.jpg` nor a
/// `.png` exists.
pub(crate) fn find_image(
    data_dir: &Path,
    image_dir: &Path,
    annotation_path: &Path,
) -> Result<PathBuf, LprIndexError> {
    let rel_path = annotation_path
        .strip_prefix(data_dir)
        .unwrap_or(annotation_path);

    let missing = || LprIndexError::MissingImage {
        path: annotation_path.to_path_buf(),
    };
    let stem = rel_path.file_stem().ok_or_else(missing)?;
    let rel_dir = rel_path.parent().unwrap_or_else(|| Path::new(""));

    for ext in IMAGE_EXTENSIONS {
        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(ext);

        let candidate = image_dir.join(rel_dir).join(file_name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(missing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(path, b"").expect("write file");
    }

    #[test]
    fn walk_finds_nested_json_in_name_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let data = temp.path().join(DATA_DIR_NAME);
        touch(&data.join("b.json"));
        touch(&data.join("a.JSON"));
        touch(&data.join("notes.txt"));
        touch(&data.join("sub/c.json"));

        let found: Vec<PathBuf> = annotation_files(&data, true)
            .map(|entry| entry.expect("walk entry"))
            .map(|path| path.strip_prefix(&data).expect("under data").to_path_buf())
            .collect();

        assert_eq!(
            found,
            vec![
                PathBuf::from("a.JSON"),
                PathBuf::from("b.json"),
                PathBuf::from("sub/c.json"),
            ]
        );
    }

    #[test]
    fn image_lookup_prefers_jpg_then_png() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let data = temp.path().join(DATA_DIR_NAME);
        let images = temp.path().join(IMAGE_DIR_NAME);

        let both = data.join("cam1/both.json");
        touch(&images.join("cam1/both.png"));
        touch(&images.join("cam1/both.jpg"));
        assert_eq!(
            find_image(&data, &images, &both).expect("image"),
            images.join("cam1/both.jpg")
        );

        let png = data.join("cam1/only.json");
        touch(&images.join("cam1/only.png"));
        assert_eq!(
            find_image(&data, &images, &png).expect("image"),
            images.join("cam1/only.png")
        );
    }

    #[test]
    fn image_lookup_keeps_inner_dots_in_stem() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let data = temp.path().join(DATA_DIR_NAME);
        let images = temp.path().join(IMAGE_DIR_NAME);

        touch(&images.join("frame.0001.jpg"));
        assert_eq!(
            find_image(&data, &images, &data.join("frame.0001.json")).expect("image"),
            images.join("frame.0001.jpg")
        );
    }

    #[test]
    fn image_in_other_directory_does_not_match() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let data = temp.path().join(DATA_DIR_NAME);
        let images = temp.path().join(IMAGE_DIR_NAME);

        touch(&images.join("x.jpg"));
        let err = find_image(&data, &images, &data.join("nested/x.json")).unwrap_err();
        assert!(matches!(err, LprIndexError::MissingImage { .. }));
    }
}
