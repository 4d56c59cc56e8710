// src/common/timing.rs

use core::time::Duration;

// === Transport ===

/// Default deadline for one "read exactly N bytes" call.
pub const READ_TIMEOUT: Duration = Duration::from_secs(2);
/// Back-off between polls of a non-blocking byte operation.
pub const IO_POLL_INTERVAL_US: u32 = 100;

// === Status polling ===

/// Pause between two reads of the status register.
pub const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long the module may take to report created + activated.
pub const START_TIMEOUT: Duration = Duration::from_secs(3);
/// How long a single measurement may take to become ready.
pub const DATA_TIMEOUT: Duration = Duration::from_secs(2);

// === Session ===

/// Settle time after stopping the module, before clearing its status.
pub const STOP_SETTLE: Duration = Duration::from_millis(500);
/// Pause between measurement cycles.
pub const CYCLE_PAUSE: Duration = Duration::from_millis(300);
/// Length of one timed measurement run.
pub const SESSION_DURATION: Duration = Duration::from_secs(100);

// === Serial link ===

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
