//! Transform requests: a transcript paired with the style it was rewritten in.

use serde::{Deserialize, Serialize};

mod style;

pub use style::StyleKind;

/// A completed rewrite. Only constructed once both remote calls have
/// resolved, and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Style the transcript was rewritten in.
    pub style: StyleKind,
    /// Raw transcript returned by the speech-to-text call.
    pub source_text: String,
    /// Rewritten text returned by the rewrite call.
    pub result_text: String,
}

impl TransformRequest {
    pub fn new(style: StyleKind, source_text: String, result_text: String) -> Self {
        Self {
            style,
            source_text,
            result_text,
        }
    }
}
