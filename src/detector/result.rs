// src/detector/result.rs

use crate::common::register::MAX_PEAKS;
use alloc::vec::Vec;

/// One detected reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub distance_mm: u32,
    pub amplitude: u32,
}

/// Peaks of one measurement cycle, in register order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    peaks: heapless::Vec<Peak, MAX_PEAKS>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a peak, handing it back if the result is full.
    pub fn push(&mut self, peak: Peak) -> Result<(), Peak> {
        self.peaks.push(peak)
    }

    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    /// Mean distance over all peaks, `None` when no peak was detected.
    pub fn mean_distance(&self) -> Option<f64> {
        if self.peaks.is_empty() {
            return None;
        }
        let sum: u64 = self.peaks.iter().map(|p| p.distance_mm as u64).sum();
        Some(sum as f64 / self.peaks.len() as f64)
    }
}

/// Range the detector is configured to cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceWindow {
    pub start_mm: u32,
    pub length_mm: u32,
}

/// Identification read while configuring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub product_id: u32,
    /// Raw firmware version buffer.
    pub firmware_version: Vec<u8>,
}

impl ModuleInfo {
    /// Version as text, up to the first NUL.
    pub fn version_str(&self) -> Option<&str> {
        let end = self
            .firmware_version
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.firmware_version.len());
        core::str::from_utf8(&self.firmware_version[..end]).ok()
    }
}
