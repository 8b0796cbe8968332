//! Telemetry UART transmit task
//!
//! Drains the telemetry channel and writes each record as one COBS frame.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;
use portable_atomic::Ordering;

use sitwell_protocol::{encode_record, MAX_FRAME_SIZE};

use crate::channels::{TELEMETRY, TELEMETRY_DROPPED};

/// Telemetry TX task - forwards records to the serial port
#[embassy_executor::task]
pub async fn telemetry_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Telemetry task started");

    let mut buf = [0u8; MAX_FRAME_SIZE];
    let mut reported_drops = 0u32;

    loop {
        let record = TELEMETRY.receive().await;

        let dropped = TELEMETRY_DROPPED.load(Ordering::Relaxed);
        if dropped != reported_drops {
            warn!("Telemetry channel full, {} records dropped", dropped);
            reported_drops = dropped;
        }

        let len = match encode_record(&record, &mut buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("Failed to encode {:?}: {:?}", record, e);
                continue;
            }
        };

        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send telemetry frame: {:?}", e);
        } else {
            trace!("Telemetry frame sent ({} bytes)", len);
        }
    }
}
