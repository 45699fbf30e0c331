//! Best-effort extraction of section fragments from malformed replies.
//!
//! When strict decoding fails (truncated output, stray prose around the
//! JSON, unbalanced braces), this pass recovers whatever well-formed section
//! fragments it can find so no generation work is silently discarded. It
//! trades precision for recall but must never promote a false match: the
//! pattern anchors on the section id together with paired `title` and
//! `content` keys, not mere brace proximity.

use crate::document::Section;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Matches `"<layer>-<index>": { ... "title": "..." ... "content": "..." }`
/// without requiring the surrounding document to be well-formed. The content
/// capture honors escaped characters so it stops at the real closing quote.
static SECTION_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#""(\d+-\d+)":\s*\{[^}]*"title":\s*"([^"]+)"[^}]*"content":\s*"((?:[^"\\]|\\.)*)""#,
    )
    .expect("section fragment pattern compiles")
});

/// Diagnostic record attached to a salvage result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalvageDiagnostic {
    /// Section scope; "general" for whole-reply records
    pub section: String,

    /// Machine-readable kind: "partial_parse" or "parse_failure"
    #[serde(rename = "errorType")]
    pub error_type: String,

    /// Human-readable summary
    pub message: String,
}

/// Sections recovered from an unparseable reply, with diagnostics and the
/// original text retained verbatim for human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalvageResult {
    /// Recovered sections; rationale fields are always null here
    pub sections: BTreeMap<String, Section>,

    /// Ordered diagnostics; never empty
    pub errors: Vec<SalvageDiagnostic>,

    /// The unparseable reply, unmodified
    #[serde(rename = "rawContent")]
    pub raw_content: String,
}

/// Scan raw reply text for recoverable section fragments.
///
/// Total: never fails for any input. When nothing matches, `sections` is
/// empty and a single `parse_failure` diagnostic records the miss.
pub fn salvage(raw: &str) -> SalvageResult {
    let mut sections = BTreeMap::new();

    for caps in SECTION_FRAGMENT.captures_iter(raw) {
        let id = caps[1].to_string();
        let title = caps[2].to_string();
        let content = unescape(&caps[3]);

        sections.insert(
            id,
            Section {
                title,
                content: Some(content),
                // Rationale boundaries are not reliably locatable in broken
                // data, so these are never pattern-extracted.
                rationale_why: None,
                rationale_condition: None,
            },
        );
    }

    let errors = if sections.is_empty() {
        vec![SalvageDiagnostic {
            section: "general".to_string(),
            error_type: "parse_failure".to_string(),
            message: "Could not extract any valid sections from reply".to_string(),
        }]
    } else {
        vec![SalvageDiagnostic {
            section: "general".to_string(),
            error_type: "partial_parse".to_string(),
            message: format!("Extracted {} section(s) from malformed reply", sections.len()),
        }]
    };

    SalvageResult {
        sections,
        errors,
        raw_content: raw.to_string(),
    }
}

/// Decode the escape sequences JSON string values carry.
fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            // Unrecognized escapes pass through untouched
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
