// src/common/mod.rs

pub mod config;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod register;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

pub use config::{DetectorConfig, TransactionConfig};

pub use error::ModuleError;

pub use frame::{
    buffer_request, decode_body, decode_header, encode_request, read_request, write_request,
    FrameError, FrameHeader, RequestBuffer, FRAME_END, HEADER_LEN, REQUEST_START,
};

pub use hal_traits::{ModuleInstant, ModuleSerial, ModuleTimer};

pub use register::{PacketType, Register};
