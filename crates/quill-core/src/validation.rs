//! Completeness validation of decoded documents.

use crate::document::Document;
use std::collections::BTreeSet;

/// Determine which expected section identifiers are missing or incomplete.
///
/// A section counts as missing when it is absent from the document's
/// mapping, or present with null/empty-after-trim content. A section with
/// content but null rationale fields passes; rationale completeness is a
/// presentational concern checked elsewhere. An empty set means the
/// document is fully valid.
pub fn missing_sections(document: &Document, expected: &[String]) -> BTreeSet<String> {
    expected
        .iter()
        .filter(|id| {
            document
                .sections
                .get(id.as_str())
                .is_none_or(|section| !section.is_complete())
        })
        .cloned()
        .collect()
}
