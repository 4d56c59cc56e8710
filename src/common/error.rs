// src/common/error.rs

use super::frame::FrameError;

#[derive(Debug, thiserror::Error)]
pub enum ModuleError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the transport.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A read or a status wait ran past its deadline.
    #[error("Operation timed out")]
    Timeout,

    /// Received frame is malformed.
    #[error("Framing error: {0}")]
    Framing(#[from] FrameError),

    /// The reply echoed a different selector byte than the request carried.
    #[error("Protocol mismatch: expected {expected:#04x}, found {found:#04x}")]
    ProtocolMismatch { expected: u8, found: u8 },

    /// Reply payload is shorter than its packet type requires.
    #[error("Short payload: needed {needed}, got {got}")]
    ShortPayload { needed: usize, got: usize },

    /// Status register reported error bits (upper 16 bits).
    #[error("Error in module, status: {status:#010x}")]
    ModuleStatus { status: u32 },

    /// Gave up waiting for a reply after discarding this many foreign frames.
    #[error("Too many discarded frames: {discarded}")]
    TooManyDiscardedFrames { discarded: usize },

    /// Module reported more peaks than the result registers can address.
    #[error("Peak count out of range: {count}")]
    PeakCountOutOfRange { count: u32 },

    /// Session operation called in the wrong lifecycle state.
    #[error("Invalid session state: {state:?}")]
    InvalidState { state: crate::detector::SessionState },
}

impl<E: core::fmt::Debug> ModuleError<E> {
    /// Raw status value for `ModuleStatus` errors.
    pub fn status(&self) -> Option<u32> {
        match self {
            ModuleError::ModuleStatus { status } => Some(*status),
            _ => None,
        }
    }
}

// `From<E>` is not provided for `Io`: it would overlap with `From<FrameError>`.
// Transport errors are mapped explicitly with `.map_err(ModuleError::Io)`.
