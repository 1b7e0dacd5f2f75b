use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use crate::aio::AnalogInput;
use crate::output::format_reading;

use super::sampler_types::{SamplerCommand, SamplerEvent};

/// Sample every input once per `period` until stopped.
///
/// Read failures are reported as events and sampling carries on; the next
/// read of a failed input reopens its file. The inputs are closed when the
/// task ends. A zero `period` is refused: the inputs are closed and the task
/// returns without sampling.
pub async fn sampler_task(
    mut inputs: Vec<AnalogInput>,
    period: Duration,
    mut cmd_rx: mpsc::Receiver<SamplerCommand>,
    event_tx: mpsc::Sender<SamplerEvent>,
) {
    if period.is_zero() {
        error!("Sampling period must be non-zero, sampler not started.");
        close_all(inputs);
        return;
    }

    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    info!(
        "Sampling {} analog input(s) every {:?}",
        inputs.len(),
        period
    );

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SamplerCommand::SampleNow) => {
                        if !sample_all(&mut inputs, &event_tx).await {
                            break;
                        }
                    }
                    Some(SamplerCommand::Stop) => {
                        info!("Sampler received stop command.");
                        break;
                    }
                    None => {
                        info!("Command channel closed, sampler exiting.");
                        break;
                    }
                }
            }
            _ = ticker.tick() => {
                if !sample_all(&mut inputs, &event_tx).await {
                    break;
                }
            }
        }
    }

    close_all(inputs);
}

fn close_all(inputs: Vec<AnalogInput>) {
    for input in inputs {
        let channel = input.channel();
        if let Err(e) = input.close() {
            warn!("Failed to close analog input channel {}: {}", channel, e);
        }
    }
}

// Returns false once nobody is listening for events.
async fn sample_all(inputs: &mut [AnalogInput], event_tx: &mpsc::Sender<SamplerEvent>) -> bool {
    for input in inputs.iter_mut() {
        let event = match input.read_reading() {
            Ok(reading) => {
                debug!("{}", format_reading(&reading));
                SamplerEvent::Reading(reading)
            }
            Err(error) => {
                warn!("Sampling channel {} failed: {}", input.channel(), error);
                SamplerEvent::Error {
                    channel: input.channel(),
                    error,
                }
            }
        };

        if event_tx.send(event).await.is_err() {
            info!("Event channel closed, sampler exiting.");
            return false;
        }
    }
    true
}
