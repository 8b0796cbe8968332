//! Per-channel circular sample buffer

use heapless::Vec;

use crate::config::MAX_WINDOW;

use super::robust;

/// One physical sensor and its rolling window
///
/// The window fills once and never un-fills: `is_ready` turns true the
/// first time the write position wraps and stays true.
#[derive(Debug, Clone)]
pub struct SensorChannel {
    index: u8,
    zone: Option<u8>,
    samples: Vec<f32, MAX_WINDOW>,
    capacity: usize,
    head: usize,
    ready: bool,
    latest: Option<f32>,
}

impl SensorChannel {
    /// Create an empty channel with a window of `capacity` samples
    ///
    /// Capacity is limited to 1..=`MAX_WINDOW`.
    pub fn new(index: u8, zone: Option<u8>, capacity: usize) -> Self {
        Self {
            index,
            zone,
            samples: Vec::new(),
            capacity: capacity.clamp(1, MAX_WINDOW),
            head: 0,
            ready: false,
            latest: None,
        }
    }

    /// Channel index
    pub fn index(&self) -> u8 {
        self.index
    }

    /// First zone this channel belongs to, if any
    pub fn zone(&self) -> Option<u8> {
        self.zone
    }

    /// Window length
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a sample, clamped to 0.0–1.0, overwriting the oldest once full
    pub fn update(&mut self, sample: f32) {
        let value = sample.clamp(0.0, 1.0);
        if self.samples.len() < self.capacity {
            let _ = self.samples.push(value);
        } else {
            self.samples[self.head] = value;
        }
        self.head += 1;
        if self.head == self.capacity {
            self.head = 0;
            self.ready = true;
        }
        self.latest = Some(value);
    }

    /// Record a failed read
    ///
    /// The window is left as is; only the latest value is invalidated.
    pub fn mark_fault(&mut self) {
        self.latest = None;
    }

    /// Most recent sample, `None` if the last read failed or nothing was read yet
    pub fn latest(&self) -> Option<f32> {
        self.latest
    }

    /// Whether the window has been filled at least once
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Samples currently held, in buffer order (not time order)
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Window median, once ready
    pub fn median(&self) -> Option<f32> {
        self.ready.then(|| robust::median(&self.samples))
    }

    /// Window MAD, once ready
    pub fn mad(&self) -> Option<f32> {
        self.ready.then(|| {
            let center = robust::median(&self.samples);
            robust::mad(&self.samples, center)
        })
    }

    /// Window consistency score, once ready
    pub fn consistency(&self, multiplier: f32) -> Option<f32> {
        self.ready
            .then(|| robust::consistency_score(&self.samples, multiplier))
    }
}
