use std::io;

use dotenv::dotenv;
use env_logger::{Builder, Target};
use log::{error, info, warn};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

use iio_aio::{
    output::{format_reading, publish_reading},
    sampler::sampler_task,
    sampler_types::*,
    AnalogInput, DaemonConfig, StaticPinMap,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok(); // load .env before the logger reads RUST_LOG
    // stdout carries the JSON readings, so logs go to stderr
    Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();
    info!("iio-aio daemon starting...");

    let config = DaemonConfig::from_env()?;
    info!(
        "IIO device: {}, resolution {} -> {} bits",
        config.aio.device_dir.display(),
        config.aio.raw_resolution_bits,
        config.aio.supported_resolution_bits
    );

    let pin_map = StaticPinMap::identity(config.channel_count);
    let mut inputs = Vec::with_capacity(config.channels.len());
    for &channel in &config.channels {
        match AnalogInput::init(channel, &pin_map, config.aio.clone()) {
            Ok(input) => inputs.push(input),
            Err(e) => warn!("Skipping analog input {}: {}", channel, e),
        }
    }
    if inputs.is_empty() {
        return Err("no analog input could be opened".into());
    }

    let (cmd_tx, cmd_rx) = mpsc::channel::<SamplerCommand>(8);
    let (event_tx, mut event_rx) = mpsc::channel::<SamplerEvent>(32);

    let sampler = tokio::spawn(sampler_task(
        inputs,
        config.sample_interval,
        cmd_rx,
        event_tx,
    ));

    // SIGUSR1 asks for an immediate sample of every input
    let mut sample_signal = signal(SignalKind::user_defined1())?;

    let mut stdout = io::stdout();
    let main_loop_result: Result<(), Box<dyn std::error::Error>> = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                if let Err(e) = cmd_tx.send(SamplerCommand::Stop).await {
                    error!("Failed to send stop command to sampler: {:?}", e);
                }
                break Ok(());
            }
            _ = sample_signal.recv() => {
                info!("Received SIGUSR1, sampling now.");
                if let Err(e) = cmd_tx.send(SamplerCommand::SampleNow).await {
                    error!("Failed to send sample command to sampler: {:?}", e);
                }
            }
            event = event_rx.recv() => {
                match event {
                    Some(SamplerEvent::Reading(reading)) => {
                        if let Err(e) = publish_reading(&mut stdout.lock(), &reading) {
                            error!("Failed to publish {}: {}", format_reading(&reading), e);
                            break Err(e.into());
                        }
                    }
                    Some(SamplerEvent::Error { channel, error }) => {
                        error!("Channel {} read failed: {}", channel, error);
                    }
                    None => {
                        info!("Sampler event stream ended, exiting.");
                        break Ok(());
                    }
                }
            }
        }
    };

    // Wait for the sampler to close its inputs
    drop(cmd_tx);
    drop(event_rx);
    if let Err(e) = sampler.await {
        error!("Sampler task failed: {:?}", e);
    }
    info!("Exited.");

    main_loop_result
}
