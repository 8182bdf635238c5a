//! Session error kinds.
//!
//! None of these are fatal: the session machine stays usable after any of
//! them, and nothing is retried automatically.

use thiserror::Error;

use crate::session::SessionPhase;

#[derive(Debug, Error)]
pub enum SessionError {
    /// The audio capture device could not be opened or torn down.
    #[error("audio capture failed: {0}")]
    Capture(#[source] anyhow::Error),

    /// An action was attempted in a phase where it is not valid.
    #[error("cannot {action} while {phase}")]
    InvalidState {
        action: &'static str,
        phase: SessionPhase,
    },

    /// The finalized recording contains no audio, so there is nothing to
    /// transcribe.
    #[error("no audio captured, record something first")]
    NoAudio,

    /// A transform is still running against the current recording.
    #[error("a transform is still in progress")]
    TransformPending,

    /// The speech-to-text call failed.
    #[error("transcription failed: {0}")]
    Transcription(#[source] anyhow::Error),

    /// The rewrite call failed.
    #[error("rewrite failed: {0}")]
    Rewrite(#[source] anyhow::Error),
}

impl SessionError {
    pub fn invalid(action: &'static str, phase: SessionPhase) -> Self {
        Self::InvalidState { action, phase }
    }
}
