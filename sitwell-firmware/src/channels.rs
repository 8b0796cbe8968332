//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicU32, Ordering};

use sitwell_protocol::TelemetryRecord;

/// Channel capacity for telemetry records
///
/// A tick can emit one event per channel plus a state change and a
/// snapshot; the telemetry task drains far faster than one tick.
const TELEMETRY_CHANNEL_SIZE: usize = 16;

/// Records waiting to be written to the telemetry UART
pub static TELEMETRY: Channel<CriticalSectionRawMutex, TelemetryRecord, TELEMETRY_CHANNEL_SIZE> =
    Channel::new();

/// Records dropped because the telemetry channel was full
pub static TELEMETRY_DROPPED: AtomicU32 = AtomicU32::new(0);

/// Queue a record without waiting
///
/// The monitor loop must never stall on the serial port, so a full
/// channel drops the record and bumps [`TELEMETRY_DROPPED`].
pub fn publish(record: TelemetryRecord) {
    if TELEMETRY.try_send(record).is_err() {
        TELEMETRY_DROPPED.fetch_add(1, Ordering::Relaxed);
    }
}
