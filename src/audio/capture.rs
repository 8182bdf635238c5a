//! Audio capture abstraction.

use anyhow::Result;

/// Trait for audio capture sources.
///
/// A source captures mono samples at a fixed rate and hands them all back
/// when stopped. Pause suspends delivery without tearing the device down.
pub trait CaptureSource: Send {
    /// Start capturing audio. Clears any samples from a previous run.
    fn start(&mut self) -> Result<()>;

    /// Suspend capture, keeping the device open.
    fn pause(&mut self) -> Result<()>;

    /// Resume a suspended capture.
    fn resume(&mut self) -> Result<()>;

    /// Stop capturing and return all captured samples.
    fn stop(&mut self) -> Result<Vec<f32>>;

    /// Whether this source currently holds an open capture.
    fn is_active(&self) -> bool;

    /// The sample rate of captured audio.
    fn sample_rate(&self) -> u32;
}
