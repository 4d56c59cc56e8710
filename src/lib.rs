// src/lib.rs

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod common;
pub mod detector;
pub mod host;

// Re-export key types for convenience
pub use common::ModuleError;
pub use detector::DistanceDetector;
pub use host::SyncHost;
