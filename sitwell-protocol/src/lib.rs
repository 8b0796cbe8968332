//! Sitwell Telemetry Protocol
//!
//! This crate defines the records the firmware streams over its serial
//! port: state changes, per-channel diagnostics, and periodic reading
//! snapshots. A host tool listens on the port and never talks back.
//!
//! # Framing
//!
//! Each record is serialized with postcard and COBS-encoded, so a frame
//! contains no zero bytes except the trailing delimiter:
//! ```text
//! ┌──────────────────────────────┬──────┐
//! │ COBS(postcard(record))       │ 0x00 │
//! │ 1–MAX_FRAME_SIZE-1 bytes     │ 1B   │
//! └──────────────────────────────┴──────┘
//! ```
//!
//! A receiver that joins mid-stream discards bytes up to the next `0x00`
//! and is in sync from then on.

#![no_std]
#![deny(unsafe_code)]

pub mod framing;
pub mod record;

pub use framing::{encode_record, RecordDecoder, TelemetryError, MAX_FRAME_SIZE};
pub use record::{PostureCode, Snapshot, TelemetryRecord, MAX_SNAPSHOT_CHANNELS};
