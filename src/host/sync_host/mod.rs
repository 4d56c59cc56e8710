// src/host/sync_host/mod.rs

//! Synchronous host side of the module protocol.
//!
//! [`SyncHost`] owns the transport for its whole lifetime and layers, from
//! the bottom up:
//! - blocking byte I/O with deadlines (`io_helpers`),
//! - frame reads and request/response correlation (`transaction`),
//! - register and buffer access (`registers`),
//! - status register polling (`status`).

use crate::common::{
    config::TransactionConfig,
    hal_traits::{ModuleSerial, ModuleTimer},
};
use alloc::vec::Vec;

mod io_helpers;
mod registers;
mod status;
mod transaction;

/// Payload of a received frame, without header and end byte.
pub type Payload = Vec<u8>;

/// Talks to one module over an exclusively owned interface.
#[derive(Debug)]
pub struct SyncHost<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    interface: IF,
    config: TransactionConfig,
}

impl<IF> SyncHost<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, TransactionConfig::default())
    }

    pub fn with_config(interface: IF, config: TransactionConfig) -> Self {
        SyncHost { interface, config }
    }

    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    pub fn interface(&self) -> &IF {
        &self.interface
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    /// Gives the interface back; dropping it closes the link.
    pub fn into_interface(self) -> IF {
        self.interface
    }
}
