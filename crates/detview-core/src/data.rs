//! Minimal detector-event record consumed by the frames.

use serde::{Deserialize, Serialize};

/// One detector event as the display sees it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Global trigger id.
    pub gtid: u32,
    /// Bit mask of the triggers that fired.
    pub trigger_word: u32,
    /// Calibrated hit values (charge or time, depending on the source).
    pub hits: Vec<f64>,
    /// Hits that carried no calibration.
    pub uncalibrated_hits: usize,
    /// Number of Monte Carlo hits, for simulated events.
    pub mc_hits: Option<u32>,
}

impl EventRecord {
    pub fn new(gtid: u32, trigger_word: u32) -> Self {
        Self {
            gtid,
            trigger_word,
            ..Default::default()
        }
    }

    pub fn with_hits(mut self, hits: Vec<f64>) -> Self {
        self.hits = hits;
        self
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}

/// Value domain mapped onto a display axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingRange {
    pub min: f64,
    pub max: f64,
}

impl ScalingRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Position of a value inside the range, 0 at `min` and 1 at `max`.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = self.span();
        if span.abs() <= f64::EPSILON {
            return 0.0;
        }
        (value - self.min) / span
    }

    /// Inverse of [`fraction`](Self::fraction).
    pub fn value_at(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }
}
