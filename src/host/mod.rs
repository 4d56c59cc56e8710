// src/host/mod.rs

pub mod sync_host;

#[cfg(feature = "std")]
pub mod serial_port;

#[cfg(test)]
pub(crate) mod mock;

// Re-export the public SyncHost struct
pub use sync_host::{Payload, SyncHost};

#[cfg(feature = "std")]
pub use serial_port::{SerialConfig, SerialInterface};
