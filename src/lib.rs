pub mod api;
pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod global;
pub mod rewrite;
pub mod session;
pub mod transcription;
pub mod transform;

pub use error::SessionError;
pub use session::{SessionMachine, SessionPhase, SessionState, SessionStatusHandle};
pub use transform::{StyleKind, TransformRequest};
