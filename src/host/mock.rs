// src/host/mock.rs

//! Scripted interface shared by the unit tests.

use crate::common::{
    frame::{FRAME_END, REQUEST_START},
    hal_traits::{ModuleSerial, ModuleTimer},
    register::PacketType,
};
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::time::Duration;

// --- Mock Instant ---
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MockInstant(pub u64);

impl core::ops::Add<Duration> for MockInstant {
    type Output = Self;
    fn add(self, rhs: Duration) -> Self {
        MockInstant(self.0.saturating_add(rhs.as_micros() as u64))
    }
}

impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct MockCommError;

// --- Mock Interface ---
#[derive(Debug, Default)]
pub(crate) struct MockInterface {
    pub current_time_us: u64,
    /// Simulated wire time of every byte read.
    pub byte_time_us: u64,
    pub read_queue: VecDeque<u8>,
    pub write_log: Vec<u8>,
    pub read_calls: usize,
    pub flush_calls: usize,
    /// Link closed: every read and write fails.
    pub closed: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_time(&mut self, us: u64) {
        self.current_time_us = self.current_time_us.saturating_add(us);
    }

    pub fn stage_read_data(&mut self, data: &[u8]) {
        self.read_queue.extend(data.iter().copied());
    }

    pub fn stage_frame(&mut self, packet_type: u8, payload: &[u8]) {
        let frame = reply_frame(packet_type, payload);
        self.stage_read_data(&frame);
    }

    pub fn stage_write_ack(&mut self, addr: u8) {
        self.stage_frame(PacketType::WriteAck.as_u8(), &[addr]);
    }

    pub fn stage_read_reply(&mut self, addr: u8, value: u32) {
        let mut payload = Vec::from([addr]);
        payload.extend_from_slice(&value.to_le_bytes());
        self.stage_frame(PacketType::ReadReply.as_u8(), &payload);
    }

    pub fn stage_buffer_reply(&mut self, sub_id: u8, data: &[u8]) {
        let mut payload = Vec::from([sub_id]);
        payload.extend_from_slice(data);
        self.stage_frame(PacketType::BufferReply.as_u8(), &payload);
    }
}

/// Builds a module reply frame around `payload`.
pub(crate) fn reply_frame(packet_type: u8, payload: &[u8]) -> Vec<u8> {
    let len = (payload.len() as u16).to_le_bytes();
    let mut frame = Vec::from([REQUEST_START, len[0], len[1], packet_type]);
    frame.extend_from_slice(payload);
    frame.push(FRAME_END);
    frame
}

/// Bytes of the request `SyncHost::read_register(addr)` writes.
pub(crate) fn read_request(addr: u8) -> Vec<u8> {
    Vec::from([REQUEST_START, 0x01, 0x00, 0xF8, addr, FRAME_END])
}

/// Bytes of the request `SyncHost::write_register(addr, value)` writes.
pub(crate) fn write_request(addr: u8, value: u32) -> Vec<u8> {
    let mut frame = Vec::from([REQUEST_START, 0x05, 0x00, 0xF9, addr]);
    frame.extend_from_slice(&value.to_le_bytes());
    frame.push(FRAME_END);
    frame
}

impl ModuleTimer for MockInterface {
    type Instant = MockInstant;
    fn now(&self) -> Self::Instant {
        MockInstant(self.current_time_us)
    }
    fn delay_us(&mut self, us: u32) {
        self.advance_time(us as u64);
    }
    fn delay_ms(&mut self, ms: u32) {
        self.advance_time((ms as u64) * 1000);
    }
}

impl ModuleSerial for MockInterface {
    type Error = MockCommError;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.read_calls += 1;
        if self.closed {
            return Err(nb::Error::Other(MockCommError));
        }
        match self.read_queue.pop_front() {
            Some(byte) => {
                self.advance_time(self.byte_time_us);
                Ok(byte)
            }
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if self.closed {
            return Err(nb::Error::Other(MockCommError));
        }
        self.write_log.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flush_calls += 1;
        Ok(())
    }
}
