// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Point in time produced by a [`ModuleTimer`].
///
/// `std::time::Instant` satisfies this, as does any tick counter that can be
/// offset by a `Duration` and subtracted into one.
pub trait ModuleInstant:
    Copy + PartialOrd + Add<Duration, Output = Self> + Sub<Self, Output = Duration>
{
}

impl<T> ModuleInstant for T where
    T: Copy + PartialOrd + Add<Duration, Output = T> + Sub<T, Output = Duration>
{
}

/// Time source and delays used for deadlines and polling.
pub trait ModuleTimer {
    type Instant: ModuleInstant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for non-blocking serial communication with the module.
///
/// The link is expected to be ordered and reliable; the protocol has no
/// checksum and no resynchronisation.
pub trait ModuleSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if no byte is available yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to queue a single byte for transmission.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to push all queued bytes onto the wire.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

pub(crate) fn duration_to_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}
