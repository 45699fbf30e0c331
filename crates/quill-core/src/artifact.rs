//! Atomic JSON artifact persistence.
//!
//! Artifacts are written to a temp file in the destination directory and
//! renamed into place, so a concurrent reader never observes a partially
//! written file. Host environments running several pipelines in parallel
//! share nothing else.

use crate::error::{QuillError, Result};
use crate::outcome::ArtifactBody;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Serialize `value` as JSON to `path` atomically.
///
/// The temp file is created in the destination's parent directory so the
/// final rename stays on one filesystem.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    if pretty {
        serde_json::to_writer_pretty(tmp.as_file_mut(), value)?;
    } else {
        serde_json::to_writer(tmp.as_file_mut(), value)?;
    }
    writeln!(tmp.as_file_mut())?;
    tmp.persist(path).map_err(|e| QuillError::Io(e.error))?;
    Ok(())
}

/// Persist an outcome payload to `path`.
pub fn write_artifact(path: &Path, body: &ArtifactBody<'_>, pretty: bool) -> Result<()> {
    match body {
        ArtifactBody::Document(document) => write_json_atomic(path, document, pretty),
        ArtifactBody::Salvage(salvage) => write_json_atomic(path, salvage, pretty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{parse_document, Document, Section};
    use crate::salvage::salvage;

    fn sample_document() -> Document {
        let mut document = Document::default();
        document.sections.insert(
            "1-1".to_string(),
            Section {
                title: "Drivers".to_string(),
                content: Some("Body text".to_string()),
                rationale_why: Some("Because".to_string()),
                rationale_condition: Some("While".to_string()),
            },
        );
        document
    }

    #[test]
    fn test_write_and_reread_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sections.json");

        let document = sample_document();
        write_artifact(&path, &ArtifactBody::Document(&document), true).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let reread = parse_document(&raw).unwrap();
        assert_eq!(reread, document);
    }

    #[test]
    fn test_write_salvage_payload_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");

        let result = salvage(r#""1-1": { "title": "T", "content": "C" }"#);
        write_artifact(&path, &ArtifactBody::Salvage(&result), false).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["errors"][0]["errorType"], "partial_parse");
        assert!(json["rawContent"].is_string());
    }

    #[test]
    fn test_write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/out.json");

        write_json_atomic(&path, &sample_document(), false).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_overwrite_replaces_previous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_json_atomic(&path, &sample_document(), false).unwrap();
        let mut second = sample_document();
        second
            .sections
            .get_mut("1-1")
            .unwrap()
            .content = Some("Replaced".to_string());
        write_json_atomic(&path, &second, false).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Replaced"));
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json_atomic(&path, &sample_document(), true).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("out.json")]);
    }
}
