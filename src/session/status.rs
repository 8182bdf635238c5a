//! Session state, pure phase transitions, and the shared status handle.
//!
//! `SessionState` owns every transition rule; the machine in
//! `session::machine` only adds side effects (capture device, WAV file,
//! remote calls) around these methods. All invalid transitions are
//! rejected with `SessionError`, never silently absorbed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::SessionError;
use crate::transform::{StyleKind, TransformRequest};

/// Phase of the recording session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Recording,
    Paused,
    Completed,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a finalized audio capture: the well-known WAV path plus the
/// size of the PCM payload that landed in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureHandle {
    pub path: PathBuf,
    pub data_bytes: u64,
}

impl CaptureHandle {
    pub fn new(path: PathBuf, data_bytes: u64) -> Self {
        Self { path, data_bytes }
    }

    /// Whether the capture actually contains audio.
    pub fn has_audio(&self) -> bool {
        self.data_bytes > 0
    }
}

/// Current session state, readable by API handlers.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub capture: Option<CaptureHandle>,
    pub started_at: Option<DateTime<Utc>>,
    pub transform_pending: Option<StyleKind>,
    pub last_transform: Option<TransformRequest>,
    pub last_error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            capture: None,
            started_at: None,
            transform_pending: None,
            last_transform: None,
            last_error: None,
        }
    }
}

impl SessionState {
    /// Duration since recording started, in seconds.
    pub fn duration_seconds(&self) -> Option<u64> {
        self.started_at.map(|started| {
            let elapsed = Utc::now() - started;
            elapsed.num_seconds().max(0) as u64
        })
    }

    /// Move to Recording. Valid from Idle, or from Completed when starting
    /// over; the previous capture handle is discarded. Rejected while a
    /// transform is still running against the old recording.
    pub fn begin_recording(&mut self) -> Result<(), SessionError> {
        if self.transform_pending.is_some() {
            return Err(SessionError::TransformPending);
        }
        match self.phase {
            SessionPhase::Idle | SessionPhase::Completed => {
                self.phase = SessionPhase::Recording;
                self.capture = None;
                self.started_at = Some(Utc::now());
                self.last_error = None;
                Ok(())
            }
            phase => Err(SessionError::invalid("start", phase)),
        }
    }

    /// Move to Paused. Valid only from Recording.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Recording => {
                self.phase = SessionPhase::Paused;
                Ok(())
            }
            phase => Err(SessionError::invalid("pause", phase)),
        }
    }

    /// Move back to Recording. Valid only from Paused; resuming while
    /// already Recording is rejected rather than double-applied.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Paused => {
                self.phase = SessionPhase::Recording;
                Ok(())
            }
            phase => Err(SessionError::invalid("resume", phase)),
        }
    }

    /// Move to Completed with the finalized capture. Valid from Recording
    /// or Paused.
    pub fn complete_capture(&mut self, handle: CaptureHandle) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Recording | SessionPhase::Paused => {
                self.phase = SessionPhase::Completed;
                self.capture = Some(handle);
                // The clock only runs while a recording is open.
                self.started_at = None;
                Ok(())
            }
            phase => Err(SessionError::invalid("stop", phase)),
        }
    }

    /// Accept a transform request and mark it pending. Valid only in
    /// Completed with a non-empty capture and no transform already running.
    /// Returns the capture handle the transform should read from.
    pub fn accept_transform(&mut self, style: StyleKind) -> Result<CaptureHandle, SessionError> {
        if self.phase != SessionPhase::Completed {
            return Err(SessionError::invalid("transform", self.phase));
        }
        if self.transform_pending.is_some() {
            return Err(SessionError::TransformPending);
        }
        let handle = self.capture.clone().ok_or(SessionError::NoAudio)?;
        if !handle.has_audio() {
            return Err(SessionError::NoAudio);
        }
        self.transform_pending = Some(style);
        Ok(handle)
    }

    /// Record a finished transform. The phase stays Completed so the user
    /// can request another style against the same recording.
    pub fn finish_transform(&mut self, request: TransformRequest) {
        self.transform_pending = None;
        self.last_error = None;
        self.last_transform = Some(request);
    }

    /// Record a failed transform. The phase stays Completed and any prior
    /// result is left untouched, so a retry is always possible.
    pub fn fail_transform(&mut self, error: String) {
        self.transform_pending = None;
        self.last_error = Some(error);
    }
}

/// Thread-safe handle for sharing session state between the machine and
/// API handlers.
#[derive(Clone, Default)]
pub struct SessionStatusHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionStatusHandle {
    pub async fn get(&self) -> SessionState {
        self.inner.lock().await.clone()
    }

    /// Lock the state for a check-and-mutate window. The machine holds
    /// this guard across its side effects so transitions never interleave.
    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, SessionState> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nonempty_handle() -> CaptureHandle {
        CaptureHandle::new(PathBuf::from("/tmp/recording.wav"), 88_200)
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(SessionPhase::Idle.as_str(), "idle");
        assert_eq!(SessionPhase::Recording.as_str(), "recording");
        assert_eq!(SessionPhase::Paused.as_str(), "paused");
        assert_eq!(SessionPhase::Completed.as_str(), "completed");
    }

    #[test]
    fn test_phase_serialization() {
        let json = serde_json::to_string(&SessionPhase::Recording).unwrap();
        assert_eq!(json, "\"recording\"");

        let parsed: SessionPhase = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(parsed, SessionPhase::Paused);
    }

    #[test]
    fn test_default_state_is_idle() {
        let state = SessionState::default();
        assert_eq!(state.phase, SessionPhase::Idle);
        assert!(state.capture.is_none());
        assert!(state.transform_pending.is_none());
        assert!(state.last_transform.is_none());
        assert!(state.last_error.is_none());
    }

    #[test]
    fn test_full_lifecycle() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        assert_eq!(state.phase, SessionPhase::Recording);
        assert!(state.started_at.is_some());

        state.pause().unwrap();
        assert_eq!(state.phase, SessionPhase::Paused);

        state.resume().unwrap();
        assert_eq!(state.phase, SessionPhase::Recording);

        state.complete_capture(nonempty_handle()).unwrap();
        assert_eq!(state.phase, SessionPhase::Completed);
        assert!(state.capture.is_some());

        // Starting over discards the old capture.
        state.begin_recording().unwrap();
        assert_eq!(state.phase, SessionPhase::Recording);
        assert!(state.capture.is_none());
    }

    #[test]
    fn test_clock_stops_when_capture_completes() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        assert!(state.duration_seconds().is_some());

        state.complete_capture(nonempty_handle()).unwrap();
        assert!(state.started_at.is_none());
        assert!(state.duration_seconds().is_none());
    }

    #[test]
    fn test_stop_valid_from_paused() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        state.pause().unwrap();
        state.complete_capture(nonempty_handle()).unwrap();
        assert_eq!(state.phase, SessionPhase::Completed);
    }

    #[test]
    fn test_completed_only_reachable_through_recording() {
        // Every path into Completed goes through complete_capture, which
        // requires Recording or Paused, and Paused requires Recording.
        let mut state = SessionState::default();
        assert!(matches!(
            state.complete_capture(nonempty_handle()),
            Err(SessionError::InvalidState { action: "stop", .. })
        ));
        assert!(matches!(
            state.pause(),
            Err(SessionError::InvalidState { action: "pause", .. })
        ));
        assert_eq!(state.phase, SessionPhase::Idle);
    }

    #[test]
    fn test_start_rejected_while_recording() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        assert!(matches!(
            state.begin_recording(),
            Err(SessionError::InvalidState { action: "start", .. })
        ));
        assert_eq!(state.phase, SessionPhase::Recording);
    }

    #[test]
    fn test_resume_while_recording_is_rejected_not_doubled() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        assert!(matches!(
            state.resume(),
            Err(SessionError::InvalidState { action: "resume", .. })
        ));
        assert_eq!(state.phase, SessionPhase::Recording);
    }

    #[test]
    fn test_transform_rejected_outside_completed() {
        let mut state = SessionState::default();
        assert!(matches!(
            state.accept_transform(StyleKind::Casual),
            Err(SessionError::InvalidState {
                action: "transform",
                ..
            })
        ));

        state.begin_recording().unwrap();
        assert!(matches!(
            state.accept_transform(StyleKind::Casual),
            Err(SessionError::InvalidState {
                action: "transform",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_size_capture_never_enables_transform() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        state
            .complete_capture(CaptureHandle::new(PathBuf::from("/tmp/recording.wav"), 0))
            .unwrap();
        assert_eq!(state.phase, SessionPhase::Completed);
        assert!(matches!(
            state.accept_transform(StyleKind::Email),
            Err(SessionError::NoAudio)
        ));
    }

    #[test]
    fn test_start_rejected_while_transform_pending() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        state.complete_capture(nonempty_handle()).unwrap();
        state.accept_transform(StyleKind::Summary).unwrap();

        assert!(matches!(
            state.begin_recording(),
            Err(SessionError::TransformPending)
        ));
        assert!(matches!(
            state.accept_transform(StyleKind::Casual),
            Err(SessionError::TransformPending)
        ));
    }

    #[test]
    fn test_failed_transform_keeps_prior_result() {
        let mut state = SessionState::default();
        state.begin_recording().unwrap();
        state.complete_capture(nonempty_handle()).unwrap();

        state.accept_transform(StyleKind::Casual).unwrap();
        state.finish_transform(TransformRequest::new(
            StyleKind::Casual,
            "buy milk".to_string(),
            "Remember to buy milk!".to_string(),
        ));

        state.accept_transform(StyleKind::Email).unwrap();
        state.fail_transform("transcription failed".to_string());

        assert_eq!(state.phase, SessionPhase::Completed);
        assert!(state.transform_pending.is_none());
        assert_eq!(
            state.last_transform.as_ref().unwrap().result_text,
            "Remember to buy milk!"
        );
        assert_eq!(
            state.last_error.as_deref(),
            Some("transcription failed")
        );
    }

    #[tokio::test]
    async fn test_status_handle_shares_state() {
        let handle = SessionStatusHandle::default();
        {
            let mut state = handle.lock().await;
            state.begin_recording().unwrap();
        }
        assert_eq!(handle.get().await.phase, SessionPhase::Recording);
    }
}
