//! Recording session orchestrator.
//!
//! Wraps the pure transitions in `session::status` with their side
//! effects: the capture device, the finalized WAV file, and the two
//! remote calls of the transform pipeline (transcribe, then rewrite —
//! strictly in that order). All dependencies are injected via the
//! constructor.
//!
//! Transitions happen while holding the status lock, so concurrent
//! callers (API handlers, a spawned transform task) can never interleave
//! a check with someone else's mutation.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::audio::{wav, CaptureSource};
use crate::error::SessionError;
use crate::rewrite::Rewriter;
use crate::session::{CaptureHandle, SessionPhase, SessionState, SessionStatusHandle};
use crate::transcription::SpeechToText;
use crate::transform::{StyleKind, TransformRequest};

/// An accepted transform: the style and the capture it will read.
/// Produced by `begin_transform`, consumed by `run_transform`.
pub struct TransformTicket {
    style: StyleKind,
    handle: CaptureHandle,
}

#[derive(Clone)]
pub struct SessionMachine {
    capture: Arc<Mutex<Box<dyn CaptureSource>>>,
    transcriber: Arc<dyn SpeechToText>,
    rewriter: Arc<dyn Rewriter>,
    status: SessionStatusHandle,
    recording_path: PathBuf,
    language: String,
}

impl SessionMachine {
    pub fn new(
        capture: Box<dyn CaptureSource>,
        transcriber: Arc<dyn SpeechToText>,
        rewriter: Arc<dyn Rewriter>,
        status: SessionStatusHandle,
        recording_path: PathBuf,
        language: String,
    ) -> Self {
        Self {
            capture: Arc::new(Mutex::new(capture)),
            transcriber,
            rewriter,
            status,
            recording_path,
            language,
        }
    }

    pub fn status(&self) -> &SessionStatusHandle {
        &self.status
    }

    /// Start a new recording, discarding any previous capture.
    pub async fn start(&self) -> Result<SessionPhase, SessionError> {
        let mut state = self.status.lock().await;
        state.begin_recording()?;

        let mut capture = self.capture.lock().await;
        if let Err(e) = capture.start() {
            error!("Failed to open capture device: {}", e);
            // Roll back: a failed start lands in Idle, not Recording.
            state.phase = SessionPhase::Idle;
            state.started_at = None;
            state.last_error = Some(e.to_string());
            return Err(SessionError::Capture(e));
        }

        info!("Recording started");
        Ok(state.phase)
    }

    /// Suspend the current recording.
    pub async fn pause(&self) -> Result<SessionPhase, SessionError> {
        let mut state = self.status.lock().await;
        state.pause()?;

        let mut capture = self.capture.lock().await;
        if let Err(e) = capture.pause() {
            error!("Failed to pause capture: {}", e);
            state.phase = SessionPhase::Recording;
            return Err(SessionError::Capture(e));
        }

        info!("Recording paused");
        Ok(state.phase)
    }

    /// Resume a suspended recording.
    pub async fn resume(&self) -> Result<SessionPhase, SessionError> {
        let mut state = self.status.lock().await;
        state.resume()?;

        let mut capture = self.capture.lock().await;
        if let Err(e) = capture.resume() {
            error!("Failed to resume capture: {}", e);
            state.phase = SessionPhase::Paused;
            return Err(SessionError::Capture(e));
        }

        info!("Recording resumed");
        Ok(state.phase)
    }

    /// Stop the recording and finalize the WAV at the well-known path.
    /// Completes even for a silent capture; transforms stay disabled then.
    pub async fn stop(&self) -> Result<SessionPhase, SessionError> {
        let mut state = self.status.lock().await;
        if !matches!(
            state.phase,
            SessionPhase::Recording | SessionPhase::Paused
        ) {
            return Err(SessionError::invalid("stop", state.phase));
        }

        let stopped = {
            let mut capture = self.capture.lock().await;
            let sample_rate = capture.sample_rate();
            capture.stop().map(|samples| (samples, sample_rate))
        };

        // Once the device has been torn down a retry cannot succeed, so
        // any failure from here lands back in Idle rather than leaving
        // the session wedged in Recording.
        let (samples, sample_rate) = match stopped {
            Ok(pair) => pair,
            Err(e) => {
                error!("Failed to stop capture: {}", e);
                return Err(Self::abandon_capture(&mut state, e));
            }
        };

        let data_bytes = match wav::write_pcm16(&self.recording_path, &samples, sample_rate) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to finalize recording: {}", e);
                return Err(Self::abandon_capture(&mut state, e));
            }
        };

        state.complete_capture(CaptureHandle::new(self.recording_path.clone(), data_bytes))?;

        info!(
            "Recording stopped: {} bytes of audio at {:?}",
            data_bytes, self.recording_path
        );
        Ok(state.phase)
    }

    /// Discard a capture that cannot be finalized and reset to Idle so
    /// the session stays usable.
    fn abandon_capture(state: &mut SessionState, error: anyhow::Error) -> SessionError {
        state.phase = SessionPhase::Idle;
        state.capture = None;
        state.started_at = None;
        state.last_error = Some(error.to_string());
        SessionError::Capture(error)
    }

    /// Validate a transform request and mark it pending. Once this
    /// returns Ok, `start` is rejected until `run_transform` settles.
    pub async fn begin_transform(
        &self,
        style: StyleKind,
    ) -> Result<TransformTicket, SessionError> {
        let mut state = self.status.lock().await;
        let handle = state.accept_transform(style)?;
        info!("Transform accepted: {} style", style);
        Ok(TransformTicket { style, handle })
    }

    /// Run the two remote calls for an accepted transform. Sequential by
    /// construction: the rewrite prompt is built from the transcript. On
    /// failure the session stays Completed and any prior result is kept.
    pub async fn run_transform(&self, ticket: TransformTicket) -> Result<String, SessionError> {
        let transcript = match self
            .transcriber
            .transcribe(&ticket.handle.path, &self.language)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("Transcription failed: {}", e);
                let mut state = self.status.lock().await;
                state.fail_transform(format!("transcription failed: {e}"));
                return Err(SessionError::Transcription(e));
            }
        };

        let prompt = ticket.style.prompt_for(&transcript);
        let rewritten = match self.rewriter.rewrite(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Rewrite failed: {}", e);
                let mut state = self.status.lock().await;
                state.fail_transform(format!("rewrite failed: {e}"));
                return Err(SessionError::Rewrite(e));
            }
        };

        let mut state = self.status.lock().await;
        state.finish_transform(TransformRequest::new(
            ticket.style,
            transcript,
            rewritten.clone(),
        ));
        info!("Transform complete: {} chars", rewritten.len());
        Ok(rewritten)
    }

    /// Convenience wrapper: accept and run in one call.
    pub async fn request_transform(&self, style: StyleKind) -> Result<String, SessionError> {
        let ticket = self.begin_transform(style).await?;
        self.run_transform(ticket).await
    }
}
