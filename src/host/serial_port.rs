// src/host/serial_port.rs

//! Serial port transport for a module attached to a host UART.
//!
//! [`SerialInterface`] implements [`ModuleSerial`] and [`ModuleTimer`] on top
//! of the `serialport` crate and `std::time`. Typical setups:
//! - Raspberry Pi mini UART: `/dev/ttyS0`, hardware flow control
//! - USB bridge: `/dev/ttyUSB0`, no flow control
//!
//! # Example
//!
//! ```no_run
//! use xm_module::host::{SerialConfig, SerialInterface, SyncHost};
//!
//! let interface = SerialInterface::open(&SerialConfig::default()).unwrap();
//! let mut host = SyncHost::new(interface);
//! let product_id = host.read_register(0x10).unwrap();
//! ```

use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use log::info;
use serialport::{FlowControl, SerialPort};

use crate::common::{
    hal_traits::{ModuleSerial, ModuleTimer},
    timing,
};

/// Serial port configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Device path, e.g. `/dev/ttyS0`.
    pub path: String,
    pub baud_rate: u32,
    /// RTS/CTS hardware flow control.
    pub flow_control: bool,
    /// Refuse to share the port with other processes (unix only).
    pub exclusive: bool,
    /// Timeout of a single OS read call.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: String::from("/dev/ttyS0"),
            baud_rate: timing::DEFAULT_BAUD_RATE,
            flow_control: true,
            exclusive: true,
            read_timeout: timing::READ_TIMEOUT,
        }
    }
}

/// Module link over a host serial port.
///
/// Writes are queued and go out on `flush`. Reads never block: a byte is
/// only read once the driver reports one pending.
pub struct SerialInterface {
    port: Box<dyn SerialPort>,
    tx: Vec<u8>,
}

impl core::fmt::Debug for SerialInterface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerialInterface")
            .field("port", &self.port.name())
            .field("pending_tx", &self.tx.len())
            .finish()
    }
}

impl SerialInterface {
    pub fn open(config: &SerialConfig) -> Result<Self, serialport::Error> {
        let flow_control = if config.flow_control {
            FlowControl::Hardware
        } else {
            FlowControl::None
        };
        let builder = serialport::new(config.path.as_str(), config.baud_rate)
            .flow_control(flow_control)
            .timeout(config.read_timeout);

        #[cfg(unix)]
        let port: Box<dyn SerialPort> = {
            let mut port = builder.open_native()?;
            port.set_exclusive(config.exclusive)?;
            Box::new(port)
        };
        #[cfg(not(unix))]
        let port = builder.open()?;

        info!(
            "opened {} at {} baud (flow control: {})",
            config.path, config.baud_rate, config.flow_control
        );
        Ok(Self::from_port(port))
    }

    /// Wraps an already opened port.
    pub fn from_port(port: Box<dyn SerialPort>) -> Self {
        SerialInterface {
            port,
            tx: Vec::new(),
        }
    }
}

impl ModuleSerial for SerialInterface {
    type Error = io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        let pending = self
            .port
            .bytes_to_read()
            .map_err(|e| nb::Error::Other(io::Error::from(e)))?;
        if pending == 0 {
            return Err(nb::Error::WouldBlock);
        }

        let mut byte = [0u8; 1];
        match self.port.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(nb::Error::WouldBlock),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Err(nb::Error::WouldBlock)
            }
            Err(e) => Err(nb::Error::Other(e)),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.tx.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if !self.tx.is_empty() {
            self.port.write_all(&self.tx).map_err(nb::Error::Other)?;
            self.tx.clear();
        }
        self.port.flush().map_err(nb::Error::Other)
    }
}

impl ModuleTimer for SerialInterface {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}
