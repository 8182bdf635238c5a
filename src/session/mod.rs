pub mod machine;
pub mod status;

pub use machine::{SessionMachine, TransformTicket};
pub use status::{CaptureHandle, SessionPhase, SessionState, SessionStatusHandle};
