//! Microphone capture via cpal.
//!
//! cpal streams are not `Send`, so the stream lives on a dedicated worker
//! thread for the duration of a capture and is commanded over a channel.
//! The `MicCaptureSource` handle itself stays `Send` and can sit behind the
//! session machine's async mutex.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tracing::{debug, error, info};

use super::capture::CaptureSource;

enum MicCommand {
    Pause,
    Resume,
    Stop(mpsc::Sender<Vec<f32>>),
}

struct Worker {
    tx: mpsc::Sender<MicCommand>,
    handle: JoinHandle<()>,
}

pub struct MicCaptureSource {
    sample_rate: u32,
    worker: Option<Worker>,
}

impl MicCaptureSource {
    /// Create a mic source targeting the given sample rate. The device is
    /// not opened until `start`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            worker: None,
        }
    }
}

impl CaptureSource for MicCaptureSource {
    fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Err(anyhow!("Mic source already recording"));
        }

        let sample_rate = self.sample_rate;
        let (cmd_tx, cmd_rx) = mpsc::channel::<MicCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<()>>();

        let handle = std::thread::spawn(move || {
            run_capture_thread(sample_rate, cmd_rx, init_tx);
        });

        // The worker reports back once the device and stream are open.
        match init_rx.recv() {
            Ok(Ok(())) => {
                self.worker = Some(Worker { tx: cmd_tx, handle });
                info!("Mic capture started at {} Hz", sample_rate);
                Ok(())
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(anyhow!("Mic capture thread exited before initializing"))
            }
        }
    }

    fn pause(&mut self) -> Result<()> {
        let worker = self
            .worker
            .as_ref()
            .ok_or_else(|| anyhow!("Mic source not recording"))?;
        worker
            .tx
            .send(MicCommand::Pause)
            .map_err(|_| anyhow!("Mic capture thread is gone"))?;
        debug!("Mic capture paused");
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        let worker = self
            .worker
            .as_ref()
            .ok_or_else(|| anyhow!("Mic source not recording"))?;
        worker
            .tx
            .send(MicCommand::Resume)
            .map_err(|_| anyhow!("Mic capture thread is gone"))?;
        debug!("Mic capture resumed");
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<f32>> {
        let worker = self
            .worker
            .take()
            .ok_or_else(|| anyhow!("Mic source not recording"))?;

        let (samples_tx, samples_rx) = mpsc::channel();
        worker
            .tx
            .send(MicCommand::Stop(samples_tx))
            .map_err(|_| anyhow!("Mic capture thread is gone"))?;

        let samples = samples_rx
            .recv()
            .map_err(|_| anyhow!("Mic capture thread dropped its samples"))?;
        let _ = worker.handle.join();

        info!("Mic capture stopped, {} samples captured", samples.len());
        Ok(samples)
    }

    fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Drop for MicCaptureSource {
    fn drop(&mut self) {
        if self.worker.is_some() {
            debug!("Dropping active MicCaptureSource, cleaning up");
            let _ = self.stop();
        }
    }
}

fn run_capture_thread(
    sample_rate: u32,
    cmd_rx: mpsc::Receiver<MicCommand>,
    init_tx: mpsc::Sender<Result<()>>,
) {
    let samples = Arc::new(Mutex::new(Vec::<f32>::new()));

    let stream = match build_input_stream(sample_rate, samples.clone()) {
        Ok(stream) => {
            let _ = init_tx.send(Ok(()));
            stream
        }
        Err(e) => {
            let _ = init_tx.send(Err(e));
            return;
        }
    };

    while let Ok(command) = cmd_rx.recv() {
        match command {
            MicCommand::Pause => {
                if let Err(e) = stream.pause() {
                    error!("Failed to pause mic stream: {}", e);
                }
            }
            MicCommand::Resume => {
                if let Err(e) = stream.play() {
                    error!("Failed to resume mic stream: {}", e);
                }
            }
            MicCommand::Stop(reply) => {
                drop(stream);
                let captured = samples
                    .lock()
                    .map(|guard| guard.clone())
                    .unwrap_or_default();
                let _ = reply.send(captured);
                return;
            }
        }
    }
}

fn build_input_stream(
    sample_rate: u32,
    samples: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .context("No input device available")?;

    info!(
        "Mic capture using device: {}",
        device.name().unwrap_or_else(|_| "unknown".to_string())
    );

    let config = cpal::StreamConfig {
        channels: 1,
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Default,
    };

    let err_fn = |err| error!("Mic stream error: {}", err);

    let stream = device
        .build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut samples) = samples.lock() {
                    samples.extend_from_slice(data);
                }
            },
            err_fn,
            None,
        )
        .context("Failed to open input stream")?;

    stream.play().context("Failed to start input stream")?;
    Ok(stream)
}
