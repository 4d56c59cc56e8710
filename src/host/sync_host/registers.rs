// src/host/sync_host/registers.rs

use super::{Payload, SyncHost};
use crate::common::{
    error::ModuleError,
    frame::{buffer_request, read_request, write_request},
    hal_traits::{ModuleSerial, ModuleTimer},
    register::{PacketType, BUFFER_SUB_ID},
};

/// Selector byte + 32-bit value.
const READ_REPLY_LEN: usize = 5;

impl<IF> SyncHost<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    /// Writes `value` to register `addr` and waits for the acknowledge.
    pub fn write_register(&mut self, addr: u8, value: u32) -> Result<(), ModuleError<IF::Error>> {
        let request = write_request(addr, value)?;
        let payload = self.send_and_await(&request, PacketType::WriteAck)?;
        check_echo(&payload, addr)
    }

    /// Reads the 32-bit value of register `addr`.
    pub fn read_register(&mut self, addr: u8) -> Result<u32, ModuleError<IF::Error>> {
        let request = read_request(addr)?;
        let payload = self.send_and_await(&request, PacketType::ReadReply)?;
        check_echo(&payload, addr)?;

        if payload.len() < READ_REPLY_LEN {
            return Err(ModuleError::ShortPayload {
                needed: READ_REPLY_LEN,
                got: payload.len(),
            });
        }
        let mut value = [0u8; 4];
        value.copy_from_slice(&payload[1..READ_REPLY_LEN]);
        Ok(u32::from_le_bytes(value))
    }

    /// Reads the module buffer starting at `offset`. Returns the bytes after
    /// the echoed sub-id, verbatim.
    pub fn read_buffer_region(&mut self, offset: u16) -> Result<Payload, ModuleError<IF::Error>> {
        let request = buffer_request(offset)?;
        let mut payload = self.send_and_await(&request, PacketType::BufferReply)?;
        check_echo(&payload, BUFFER_SUB_ID)?;
        payload.remove(0);
        Ok(payload)
    }

    /// Waits for the next streaming push frame. Nothing is written.
    pub fn read_stream_payload(&mut self) -> Result<Payload, ModuleError<IF::Error>> {
        let (_header, payload) = self.read_frame_of_type(PacketType::StreamPush)?;
        Ok(payload)
    }
}

/// The first reply byte must repeat the request's selector.
fn check_echo<E: core::fmt::Debug>(payload: &[u8], expected: u8) -> Result<(), ModuleError<E>> {
    match payload.first() {
        Some(&found) if found == expected => Ok(()),
        Some(&found) => Err(ModuleError::ProtocolMismatch { expected, found }),
        None => Err(ModuleError::ShortPayload { needed: 1, got: 0 }),
    }
}
