// src/common/config.rs

use core::time::Duration;

use super::{register, timing};

/// Settings for the request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionConfig {
    /// Deadline for each header or body read.
    pub read_timeout: Duration,
    /// Give up waiting for a reply after this many frames of another type.
    /// `None` keeps discarding for as long as frames keep arriving.
    pub max_discarded_frames: Option<usize>,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            read_timeout: timing::READ_TIMEOUT,
            max_discarded_frames: None,
        }
    }
}

/// Settings for a distance detection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    pub transaction: TransactionConfig,
    /// Value written to the mode selection register.
    pub mode: u32,
    /// Update rate in mHz (1000 = 1 Hz).
    pub update_rate_mhz: u32,
    pub stop_settle: Duration,
    pub start_timeout: Duration,
    pub data_timeout: Duration,
    pub cycle_pause: Duration,
    pub session_duration: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            transaction: TransactionConfig::default(),
            mode: register::MODE_DISTANCE,
            update_rate_mhz: 1000,
            stop_settle: timing::STOP_SETTLE,
            start_timeout: timing::START_TIMEOUT,
            data_timeout: timing::DATA_TIMEOUT,
            cycle_pause: timing::CYCLE_PAUSE,
            session_duration: timing::SESSION_DURATION,
        }
    }
}
