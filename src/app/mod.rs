//! Service wiring and the single command loop.
//!
//! All session mutations flow through this loop one command at a time.
//! Transform pipelines are validated inline, then their remote calls run
//! on a spawned machine clone so the loop stays responsive; the pending
//! marker set during validation keeps `start` rejected until the pipeline
//! settles.

use crate::api::{ApiServer, SessionCommand};
use crate::audio::MicCaptureSource;
use crate::config::Config;
use crate::rewrite::build_rewriter;
use crate::session::{SessionMachine, SessionStatusHandle};
use crate::transcription::build_transcriber;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

pub async fn run_service() -> Result<()> {
    info!("Starting JustTalk service");

    let config = Config::load()?;

    let transcriber = Arc::new(build_transcriber(&config.transcription)?);
    let rewriter = Arc::new(build_rewriter(&config.rewrite)?);
    let capture = Box::new(MicCaptureSource::new(config.audio.sample_rate));

    let language = config
        .transcription
        .language
        .clone()
        .unwrap_or_else(|| "en".to_string());

    let status_handle = SessionStatusHandle::default();
    let machine = SessionMachine::new(
        capture,
        transcriber,
        rewriter,
        status_handle.clone(),
        config.recording_path()?,
        language,
    );

    let (tx, mut rx) = mpsc::channel::<SessionCommand>(10);

    let api_server = ApiServer::new(tx, status_handle, &config);
    tokio::spawn(async move {
        if let Err(e) = api_server.start().await {
            error!("API server failed: {}", e);
        }
    });

    info!("JustTalk is ready!");
    info!("Try: curl -X POST http://127.0.0.1:{}/start", config.server.port);

    while let Some(command) = rx.recv().await {
        match command {
            SessionCommand::Start { reply } => {
                let _ = reply.send(machine.start().await);
            }
            SessionCommand::Pause { reply } => {
                let _ = reply.send(machine.pause().await);
            }
            SessionCommand::Resume { reply } => {
                let _ = reply.send(machine.resume().await);
            }
            SessionCommand::Stop { reply } => {
                let _ = reply.send(machine.stop().await);
            }
            SessionCommand::Transform { style, reply } => {
                // Validate while the loop holds control, then let the
                // remote calls run without blocking other commands.
                match machine.begin_transform(style).await {
                    Ok(ticket) => {
                        let machine = machine.clone();
                        tokio::spawn(async move {
                            let _ = reply.send(machine.run_transform(ticket).await);
                        });
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
        }
    }

    Ok(())
}
