//! Seat monitor task
//!
//! Runs the cooperative sense/decide/act loop at the configured tick
//! interval and forwards what happened to the telemetry channel.

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use sitwell_core::state::EngineEvent;
use sitwell_core::telemetry::snapshot;
use sitwell_core::{Monitor, StepOutcome, TickReport};
use sitwell_drivers::feedback::{GpioBuzzer, GpioRgbLed};
use sitwell_drivers::input::StopButton;
use sitwell_drivers::sensor::FsrArray;
use sitwell_hal_rp2040::{AdcBank, RpInput, RpOutput};
use sitwell_protocol::TelemetryRecord;

use crate::channels::publish;

/// The monitor as wired on an RP2040 board
pub type SeatMonitor = Monitor<
    FsrArray<AdcBank<'static>>,
    GpioRgbLed<RpOutput, RpOutput, RpOutput>,
    Option<GpioBuzzer<RpOutput>>,
    Option<StopButton<RpInput>>,
>;

/// Loop timing and snapshot settings
#[derive(Clone, Copy)]
pub struct MonitorSettings {
    /// Delay between ticks (ms)
    pub tick_interval_ms: u32,
    /// Interval between reading snapshots (ms, 0 = off)
    pub snapshot_interval_ms: u32,
}

/// Monitor task - one engine tick per ticker period until stopped
#[embassy_executor::task]
pub async fn monitor_task(mut monitor: SeatMonitor, settings: MonitorSettings) {
    info!(
        "Monitor task started ({} ms tick, {} channels)",
        settings.tick_interval_ms,
        monitor.engine().channel_count()
    );

    let mut ticker = Ticker::every(Duration::from_millis(settings.tick_interval_ms as u64));
    let start = Instant::now();
    let mut last_snapshot: Option<u32> = None;

    loop {
        // Millisecond counter, wraps after ~49 days
        let now_ms = start.elapsed().as_millis() as u32;

        match monitor.step(now_ms) {
            StepOutcome::Ran(report) => {
                report_tick(&report, now_ms);

                let due = last_snapshot
                    .map_or(true, |t| now_ms.wrapping_sub(t) >= settings.snapshot_interval_ms);
                if settings.snapshot_interval_ms > 0 && due {
                    let sensors = monitor.sensors();
                    let snap = snapshot(&report.samples, now_ms, |v| sensors.millivolts(v));
                    publish(TelemetryRecord::Snapshot(snap));
                    last_snapshot = Some(now_ms);
                }
            }
            StepOutcome::Stopped => {
                warn!("Stop requested, monitor halted");
                publish(EngineEvent::Halted.to_record(now_ms));
                break;
            }
            StepOutcome::Halted => break,
        }

        ticker.next().await;
    }

    info!("Monitor task finished");
}

/// Log a tick and queue its events
fn report_tick(report: &TickReport, now_ms: u32) {
    trace!("t={} samples={:?}", now_ms, report.samples.as_slice());

    if report.state_changed() {
        if report.state.is_warning() {
            warn!("Posture state: {:?} ({:?})", report.state, report.verdict);
        } else {
            info!("Posture state: {:?} ({:?})", report.state, report.verdict);
        }
    }

    for event in &report.events {
        match event {
            EngineEvent::SensorFault { channel, error } => {
                warn!("Sensor {} fault: {:?}", channel, error);
            }
            EngineEvent::StableReported { held_ms } => {
                info!("Posture held for {} ms", held_ms);
            }
            _ => debug!("{:?}", event),
        }
        publish(event.to_record(now_ms));
    }
}
