// src/common/register.rs

//! Register map and packet types of the distance-detector firmware.
//!
//! Register values are 32-bit little-endian on the wire.

/// Frame `type` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    /// Host → module register read.
    ReadRequest = 0xF8,
    /// Host → module register write.
    WriteRequest = 0xF9,
    /// Host → module buffer read.
    BufferRequest = 0xFA,
    /// Module → host write acknowledge.
    WriteAck = 0xF5,
    /// Module → host register value.
    ReadReply = 0xF6,
    /// Module → host buffer contents.
    BufferReply = 0xF7,
    /// Module → host unsolicited streaming data.
    StreamPush = 0xFE,
}

impl PacketType {
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<PacketType> for u8 {
    fn from(value: PacketType) -> Self {
        value as u8
    }
}

/// Sub-id selecting the firmware buffer in buffer reads.
pub const BUFFER_SUB_ID: u8 = 0xE8;

/// Register addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register;

impl Register {
    pub const MODE_SELECTION: u8 = 0x02;
    pub const MAIN_CONTROL: u8 = 0x03;
    pub const STREAMING_CONTROL: u8 = 0x05;
    pub const STATUS: u8 = 0x06;
    pub const PRODUCT_ID: u8 = 0x10;
    pub const UPDATE_RATE: u8 = 0x23;
    pub const RANGE_START: u8 = 0x81;
    pub const RANGE_LENGTH: u8 = 0x82;
    pub const PEAK_COUNT: u8 = 0xB0;
    /// Distance of peak 0; peak `n` lives at `PEAK_DISTANCE_BASE + 2n`.
    pub const PEAK_DISTANCE_BASE: u8 = 0xB1;
    /// Amplitude of peak 0; peak `n` lives at `PEAK_AMPLITUDE_BASE + 2n`.
    pub const PEAK_AMPLITUDE_BASE: u8 = 0xB2;

    /// Distance register of peak `index`, if it fits the address space.
    pub fn peak_distance(index: u32) -> Option<u8> {
        peak_register(Self::PEAK_DISTANCE_BASE, index)
    }

    /// Amplitude register of peak `index`, if it fits the address space.
    pub fn peak_amplitude(index: u32) -> Option<u8> {
        peak_register(Self::PEAK_AMPLITUDE_BASE, index)
    }
}

fn peak_register(base: u8, index: u32) -> Option<u8> {
    let offset = index.checked_mul(2)?;
    u8::try_from(offset).ok()?.checked_add(base)
}

/// Highest number of peaks whose result registers are addressable.
pub const MAX_PEAKS: usize = ((u8::MAX - Register::PEAK_AMPLITUDE_BASE) / 2) as usize + 1;

// --- MAIN_CONTROL commands ---

pub const MAIN_CONTROL_STOP: u32 = 0;
pub const MAIN_CONTROL_CREATE_AND_ACTIVATE: u32 = 3;
/// Clears errors and status; also requests the next measurement.
pub const MAIN_CONTROL_CLEAR_STATUS: u32 = 4;

// --- MODE_SELECTION values ---

pub const MODE_DISTANCE: u32 = 0x200;

// --- STREAMING_CONTROL values ---

pub const STREAMING_DISABLED: u32 = 0;

// --- STATUS bits ---

pub const STATUS_CREATED: u32 = 0x0000_0001;
pub const STATUS_ACTIVATED: u32 = 0x0000_0002;
pub const STATUS_DATA_READY: u32 = 0x0000_0100;
/// Any bit here means the module is in an error state.
pub const STATUS_ERROR_MASK: u32 = 0xFFFF_0000;
