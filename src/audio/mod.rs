pub mod capture;
pub mod mic;
pub mod wav;

pub use capture::CaptureSource;
pub use mic::MicCaptureSource;
