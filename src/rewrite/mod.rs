//! Text rewrite capability.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

mod openai;

pub use openai::OpenAiRewriter;

use crate::config::RewriteConfig;

/// Trait for remote text-rewrite services. The prompt already carries the
/// style instruction prefixed to the transcript.
#[async_trait]
pub trait Rewriter: Send + Sync {
    fn name(&self) -> &'static str;

    async fn rewrite(&self, prompt: &str) -> Result<String>;
}

/// Build the configured rewrite provider.
pub fn build_rewriter(config: &RewriteConfig) -> Result<OpenAiRewriter> {
    let api_key = config
        .api_key
        .clone()
        .context("rewrite.api_key is not configured")?;

    let rewriter = OpenAiRewriter::new(
        api_key,
        config.model.clone(),
        config.temperature,
        config.api_endpoint.clone(),
    );
    info!("Using {} for rewriting", rewriter.name());
    Ok(rewriter)
}
