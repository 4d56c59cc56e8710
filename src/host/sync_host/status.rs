// src/host/sync_host/status.rs

use super::SyncHost;
use crate::common::{
    error::ModuleError,
    hal_traits::{duration_to_ms, ModuleSerial, ModuleTimer},
    register::{
        Register, STATUS_ACTIVATED, STATUS_CREATED, STATUS_DATA_READY, STATUS_ERROR_MASK,
    },
    timing,
};
use core::time::Duration;
use log::{debug, warn};

impl<IF> SyncHost<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    /// Polls the status register until every bit of `wanted_bits` is set.
    ///
    /// Each poll reads the register first, then checks, in order: elapsed
    /// time against `max_time`, the error mask, the wanted bits. So at least
    /// one read always happens, even for a zero `max_time`.
    ///
    /// Returns the status value that satisfied the mask.
    pub fn wait_status_set(
        &mut self,
        wanted_bits: u32,
        max_time: Duration,
    ) -> Result<u32, ModuleError<IF::Error>> {
        let start = self.interface.now();

        loop {
            let status = self.read_register(Register::STATUS)?;
            debug!("status {:#010x}", status);

            if self.interface.now() - start > max_time {
                return Err(ModuleError::Timeout);
            }
            if status & STATUS_ERROR_MASK != 0 {
                warn!("module reports error, status: {:#010x}", status);
                return Err(ModuleError::ModuleStatus { status });
            }
            if status & wanted_bits == wanted_bits {
                return Ok(status);
            }

            self.interface
                .delay_ms(duration_to_ms(timing::STATUS_POLL_INTERVAL));
        }
    }

    /// Waits up to 3 s for the module to be created and activated.
    pub fn wait_start(&mut self) -> Result<u32, ModuleError<IF::Error>> {
        self.wait_start_within(timing::START_TIMEOUT)
    }

    pub fn wait_start_within(&mut self, max_time: Duration) -> Result<u32, ModuleError<IF::Error>> {
        self.wait_status_set(STATUS_CREATED | STATUS_ACTIVATED, max_time)
    }

    /// Waits for the data-ready bit.
    pub fn wait_for_data(&mut self, max_time: Duration) -> Result<u32, ModuleError<IF::Error>> {
        self.wait_status_set(STATUS_DATA_READY, max_time)
    }
}
