//! Terminal pipeline outcomes and the external signals they map to.
//!
//! Fatal faults travel as errors. Everything else (full success, decoded
//! but incomplete, salvaged fragments) travels through this result-variant
//! channel so callers can inspect partial work instead of catching
//! exceptions for it.

use crate::document::Document;
use crate::llm::ClassifiedError;
use crate::salvage::SalvageResult;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Terminal classification of one pipeline run.
///
/// Created once at the end of the pipeline; immutable.
#[derive(Debug)]
pub enum Outcome {
    /// Document decoded and every expected section is complete
    FullSuccess { document: Document },

    /// Document decoded but validation found missing/incomplete sections
    PartialDocument {
        document: Document,
        missing: BTreeSet<String>,
    },

    /// Strict decode failed; salvage ran (possibly recovering nothing)
    PartialSalvage { salvage: SalvageResult },

    /// Backend succeeded at the transport level but returned no usable text
    EmptyReply,

    /// Non-retryable backend error, or retry budget exhausted
    FatalBackend { error: ClassifiedError },
}

/// What the hosting process should do after reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitIntention {
    /// Everything generated and validated
    Success,
    /// Partial result persisted for human review
    Recoverable,
    /// Nothing usable produced
    Fatal,
}

/// Caller-visible result envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Signals {
    /// True only for a fully validated document
    pub success: bool,

    /// Where full/partial structured content was persisted
    #[serde(rename = "outputLocation")]
    pub output_location: Option<PathBuf>,

    /// Present for every non-success outcome
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,

    /// Exit intention; not part of the wire envelope
    #[serde(skip)]
    pub exit: ExitIntention,
}

/// Persistable payload of an outcome.
#[derive(Debug)]
pub enum ArtifactBody<'a> {
    /// Full or partially-validated decoded document
    Document(&'a Document),
    /// Salvage result: recovered sections, diagnostics, raw reply
    Salvage(&'a SalvageResult),
}

impl Outcome {
    /// The payload to persist, if this outcome carries one.
    ///
    /// Salvage payloads are persisted even with zero recovered sections,
    /// since the retained raw text is what a human reviewer works from.
    /// Fatal and empty-reply outcomes carry nothing.
    pub fn payload(&self) -> Option<ArtifactBody<'_>> {
        match self {
            Outcome::FullSuccess { document } | Outcome::PartialDocument { document, .. } => {
                Some(ArtifactBody::Document(document))
            }
            Outcome::PartialSalvage { salvage } => Some(ArtifactBody::Salvage(salvage)),
            Outcome::EmptyReply | Outcome::FatalBackend { .. } => None,
        }
    }

    /// Map this outcome onto externally observable signals.
    ///
    /// `output_location` is where [`Outcome::payload`] was persisted; it is
    /// ignored for outcomes that carry no payload.
    pub fn signals(&self, output_location: Option<PathBuf>) -> Signals {
        match self {
            Outcome::FullSuccess { .. } => Signals {
                success: true,
                output_location,
                error_message: None,
                exit: ExitIntention::Success,
            },
            Outcome::PartialDocument { missing, .. } => Signals {
                success: false,
                output_location,
                error_message: Some(format!(
                    "Missing sections: {}",
                    missing.iter().cloned().collect::<Vec<_>>().join(", ")
                )),
                exit: ExitIntention::Recoverable,
            },
            Outcome::PartialSalvage { salvage } => {
                let message = if salvage.sections.is_empty() {
                    "Reply decode failed; no sections salvaged".to_string()
                } else {
                    format!(
                        "Reply decode failed; salvaged {} section(s)",
                        salvage.sections.len()
                    )
                };
                Signals {
                    success: false,
                    output_location,
                    error_message: Some(message),
                    exit: ExitIntention::Recoverable,
                }
            }
            Outcome::EmptyReply => Signals {
                success: false,
                output_location: None,
                error_message: Some("Backend returned an empty reply".to_string()),
                exit: ExitIntention::Fatal,
            },
            Outcome::FatalBackend { error } => Signals {
                success: false,
                output_location: None,
                error_message: Some(format!("Backend call failed: {error}")),
                exit: ExitIntention::Fatal,
            },
        }
    }
}
