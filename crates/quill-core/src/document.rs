//! Section document types and strict decoding.
//!
//! A reply is expected to be a JSON object with a top-level `sections`
//! mapping from `"<layer>-<index>"` identifiers to section records. The
//! decode here is strict and attaches no partial data; recovery from
//! malformed replies belongs entirely to the salvager.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named unit of generated content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    /// Section heading. Tolerated missing on the wire (empty string) so a
    /// single title-less section degrades to a validation gap, not a decode
    /// failure for the whole document.
    #[serde(default)]
    pub title: String,

    /// Body text; absent or empty means the section is incomplete
    #[serde(default)]
    pub content: Option<String>,

    /// Why this section's content was chosen; null when salvaged
    #[serde(default)]
    pub rationale_why: Option<String>,

    /// Conditions under which the rationale holds; null when salvaged
    #[serde(default)]
    pub rationale_condition: Option<String>,
}

impl Section {
    /// A section is complete iff its content is present and non-empty after
    /// trimming. Null rationale fields do not affect completeness.
    pub fn is_complete(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// The decoded structured reply: section identifier → section record.
///
/// `BTreeMap` keeps persisted artifacts and iteration order stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub sections: BTreeMap<String, Section>,
}

/// Strictly decode raw reply text into a [`Document`].
///
/// Fails when the text is not valid JSON, or is valid JSON without the
/// required top-level `sections` mapping. No recovery is attempted here.
pub fn parse_document(raw: &str) -> Result<Document, DecodeError> {
    serde_json::from_str(raw).map_err(|e| DecodeError {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(content: Option<&str>) -> Section {
        Section {
            title: "Business Drivers".to_string(),
            content: content.map(String::from),
            rationale_why: None,
            rationale_condition: None,
        }
    }

    #[test]
    fn test_complete_section() {
        assert!(section(Some("Drivers are...")).is_complete());
    }

    #[test]
    fn test_absent_content_incomplete() {
        assert!(!section(None).is_complete());
    }

    #[test]
    fn test_whitespace_content_incomplete() {
        assert!(!section(Some("   \n\t ")).is_complete());
    }

    #[test]
    fn test_parse_valid_document() {
        let raw = r#"{
            "sections": {
                "1-1": {
                    "title": "Business Drivers",
                    "content": "The drivers are...",
                    "rationale_why": "Because...",
                    "rationale_condition": "While..."
                }
            }
        }"#;
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections["1-1"].is_complete());
        assert_eq!(doc.sections["1-1"].title, "Business Drivers");
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_parse_rejects_missing_sections_key() {
        assert!(parse_document(r#"{"body": "text"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_nonmapping_sections() {
        assert!(parse_document(r#"{"sections": "1-1"}"#).is_err());
        assert!(parse_document(r#"{"sections": ["1-1"]}"#).is_err());
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let raw = r#"{"sections": {"2-3": {"title": "Controls"}}}"#;
        let doc = parse_document(raw).unwrap();
        let s = &doc.sections["2-3"];
        assert_eq!(s.content, None);
        assert_eq!(s.rationale_why, None);
        assert!(!s.is_complete());
    }

    #[test]
    fn test_parse_preserves_section_order_deterministically() {
        let raw = r#"{"sections": {"1-2": {"title": "B"}, "1-1": {"title": "A"}}}"#;
        let doc = parse_document(raw).unwrap();
        let keys: Vec<_> = doc.sections.keys().cloned().collect();
        assert_eq!(keys, vec!["1-1", "1-2"]);
    }

    #[test]
    fn test_document_round_trips_through_json() {
        let raw = r#"{"sections": {"1-1": {"title": "A", "content": "body", "rationale_why": null, "rationale_condition": null}}}"#;
        let doc = parse_document(raw).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let again = parse_document(&json).unwrap();
        assert_eq!(doc, again);
    }
}
