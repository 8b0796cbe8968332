//! COBS framing for telemetry records
//!
//! Encoding writes one complete frame (including the `0x00` delimiter)
//! into a caller buffer. Decoding is byte-at-a-time so it can sit
//! directly behind a UART read loop.

use heapless::Vec;

use crate::record::TelemetryRecord;

/// Largest frame the decoder accepts, delimiter included
pub const MAX_FRAME_SIZE: usize = 64;

/// COBS frame delimiter
const DELIMITER: u8 = 0x00;

/// Errors from encoding or decoding a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// Output buffer cannot hold the encoded frame
    BufferTooSmall,
    /// Serializer rejected the record
    Encode,
    /// Frame did not decode into a record
    Decode,
    /// Frame exceeded `MAX_FRAME_SIZE` before its delimiter
    Overflow,
}

/// Encode `record` as one delimited frame into `buffer`
///
/// Returns the number of bytes written, delimiter included.
pub fn encode_record(record: &TelemetryRecord, buffer: &mut [u8]) -> Result<usize, TelemetryError> {
    postcard::to_slice_cobs(record, buffer)
        .map(|frame| frame.len())
        .map_err(|e| match e {
            postcard::Error::SerializeBufferFull => TelemetryError::BufferTooSmall,
            _ => TelemetryError::Encode,
        })
}

/// Incremental frame decoder
#[derive(Debug, Default)]
pub struct RecordDecoder {
    buffer: Vec<u8, MAX_FRAME_SIZE>,
    overflowed: bool,
}

impl RecordDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte
    ///
    /// Returns `Some` when a delimiter completes a frame. An oversized or
    /// corrupt frame yields an error and the decoder resumes at the next
    /// frame.
    pub fn push(&mut self, byte: u8) -> Option<Result<TelemetryRecord, TelemetryError>> {
        if byte != DELIMITER {
            if !self.overflowed && self.buffer.push(byte).is_err() {
                self.overflowed = true;
            }
            return None;
        }

        if self.overflowed {
            self.reset();
            return Some(Err(TelemetryError::Overflow));
        }

        if self.buffer.is_empty() {
            // Back-to-back delimiters carry no frame
            return None;
        }

        let result = match self.buffer.push(DELIMITER) {
            Ok(()) => postcard::from_bytes_cobs::<TelemetryRecord>(&mut self.buffer)
                .map_err(|_| TelemetryError::Decode),
            Err(_) => Err(TelemetryError::Overflow),
        };
        self.reset();
        Some(result)
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{PostureCode, Snapshot};

    fn feed(decoder: &mut RecordDecoder, bytes: &[u8]) -> Option<Result<TelemetryRecord, TelemetryError>> {
        let mut last = None;
        for &b in bytes {
            if let Some(result) = decoder.push(b) {
                last = Some(result);
            }
        }
        last
    }

    #[test]
    fn test_frame_has_single_trailing_delimiter() {
        let record = TelemetryRecord::StateChanged {
            from: PostureCode::Stable,
            to: PostureCode::Destabilized,
            at_ms: 0,
        };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = encode_record(&record, &mut buf).unwrap();

        assert_eq!(buf[len - 1], 0x00);
        assert!(buf[..len - 1].iter().all(|&b| b != 0x00));
    }

    #[test]
    fn test_decode_stream_of_frames() {
        let mut snap = Snapshot::new(1_000);
        snap.push(Some(1650));
        snap.push(Some(0));
        snap.push(None);

        let records = [
            TelemetryRecord::Boot {
                channels: 4,
                window: 20,
                debounce: 3,
            },
            TelemetryRecord::Snapshot(snap),
            TelemetryRecord::ChannelInconsistent {
                channel: 0,
                score_x1000: 450,
            },
        ];

        let mut stream = [0u8; 3 * MAX_FRAME_SIZE];
        let mut pos = 0;
        for r in &records {
            pos += encode_record(r, &mut stream[pos..]).unwrap();
        }

        let mut decoder = RecordDecoder::new();
        let mut decoded = heapless::Vec::<TelemetryRecord, 4>::new();
        for &b in &stream[..pos] {
            if let Some(result) = decoder.push(b) {
                decoded.push(result.unwrap()).unwrap();
            }
        }

        assert_eq!(decoded.as_slice(), &records);
    }

    #[test]
    fn test_buffer_too_small() {
        let record = TelemetryRecord::StableReported { held_ms: 5_000 };
        let mut buf = [0u8; 2];
        assert_eq!(
            encode_record(&record, &mut buf),
            Err(TelemetryError::BufferTooSmall)
        );
    }

    #[test]
    fn test_resync_after_garbage() {
        let mut decoder = RecordDecoder::new();

        // Mid-stream join: junk then a delimiter
        let junk = feed(&mut decoder, &[0x07, 0xFF, 0x13, 0x00]);
        assert_eq!(junk, Some(Err(TelemetryError::Decode)));

        let record = TelemetryRecord::Halted { at_ms: 42 };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = encode_record(&record, &mut buf).unwrap();
        assert_eq!(feed(&mut decoder, &buf[..len]), Some(Ok(record)));
    }

    #[test]
    fn test_overflow_is_reported_once() {
        let mut decoder = RecordDecoder::new();
        for _ in 0..(MAX_FRAME_SIZE * 2) {
            assert!(decoder.push(0x01).is_none());
        }
        assert_eq!(decoder.push(0x00), Some(Err(TelemetryError::Overflow)));

        // Decoder is usable again
        let record = TelemetryRecord::SensorFault { channel: 3 };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = encode_record(&record, &mut buf).unwrap();
        assert_eq!(feed(&mut decoder, &buf[..len]), Some(Ok(record)));
    }

    #[test]
    fn test_empty_frames_ignored() {
        let mut decoder = RecordDecoder::new();
        assert!(decoder.push(0x00).is_none());
        assert!(decoder.push(0x00).is_none());
    }
}
