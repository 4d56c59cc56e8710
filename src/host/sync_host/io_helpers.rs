// src/host/sync_host/io_helpers.rs

use super::SyncHost;
use crate::common::{
    error::ModuleError,
    hal_traits::{ModuleSerial, ModuleTimer},
    timing,
};

// Implementation block for I/O related helpers
impl<IF> SyncHost<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout
    /// error once `deadline` has passed. The first attempt is always made.
    pub(super) fn execute_blocking_io_until<FN, T>(
        &mut self,
        deadline: IF::Instant,
        mut f: FN,
    ) -> Result<T, ModuleError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> nb::Result<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Err(ModuleError::Timeout);
                    }
                    self.interface.delay_us(timing::IO_POLL_INTERVAL_US);
                }
                Err(nb::Error::Other(e)) => return Err(ModuleError::Io(e)),
            }
        }
    }

    /// Fills `buf` completely. All bytes share one read deadline.
    pub(super) fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ModuleError<IF::Error>> {
        let deadline = self.interface.now() + self.config.read_timeout;
        for slot in buf.iter_mut() {
            *slot = self.execute_blocking_io_until(deadline, |iface| iface.read_byte())?;
        }
        Ok(())
    }

    /// Writes `bytes` and flushes them onto the wire.
    pub(super) fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), ModuleError<IF::Error>> {
        let deadline = self.interface.now() + self.config.read_timeout;
        for byte in bytes {
            self.execute_blocking_io_until(deadline, |iface| iface.write_byte(*byte))?;
        }
        self.execute_blocking_io_until(deadline, |iface| iface.flush())
    }
}
