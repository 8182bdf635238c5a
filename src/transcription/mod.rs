//! Speech-to-text capability.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

mod openai;

pub use openai::OpenAiTranscription;

use crate::config::TranscriptionConfig;

/// Trait for remote speech-to-text services.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    fn name(&self) -> &'static str;

    /// Transcribe the audio file at `path` and return the raw transcript.
    async fn transcribe(&self, path: &Path, language: &str) -> Result<String>;
}

/// Build the configured speech-to-text provider.
pub fn build_transcriber(config: &TranscriptionConfig) -> Result<OpenAiTranscription> {
    let api_key = config
        .api_key
        .clone()
        .context("transcription.api_key is not configured")?;

    let transcriber = OpenAiTranscription::new(
        api_key,
        config.model.clone(),
        config.api_endpoint.clone(),
    );
    info!("Using {} for transcription", transcriber.name());
    Ok(transcriber)
}
