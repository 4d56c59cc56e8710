// src/common/frame.rs

//! Frame encoding and decoding for the module UART protocol.
//!
//! Frame format:
//! ```text
//! ┌─────┬────────┬────────┬──────┬──────────────┬──────┐
//! │ TAG │ LEN_LO │ LEN_HI │ TYPE │ PAYLOAD      │ END  │
//! │ 1B  │ 1B     │ 1B     │ 1B   │ LEN bytes    │ 0xCD │
//! └─────┴────────┴────────┴──────┴──────────────┴──────┘
//! ```
//!
//! Requests always carry the tag `0xCC`. Responses are accepted with any tag.
//! The first payload byte of a request is its selector (a register address,
//! or a buffer sub-id); the module echoes it as the first byte of the reply.
//!
//! Header and payload-plus-end are read separately off the wire, so decoding
//! is split into [`decode_header`] and [`decode_body`].

use arrayvec::ArrayVec;

use super::register::{PacketType, BUFFER_SUB_ID};

/// Tag byte leading every request frame.
pub const REQUEST_START: u8 = 0xCC;
/// Terminator byte closing every frame.
pub const FRAME_END: u8 = 0xCD;
/// Tag + 16-bit length + type.
pub const HEADER_LEN: usize = 4;

/// Largest request body the encoder accepts (excluding the selector byte).
pub const MAX_REQUEST_BODY: usize = 8;
/// Header + selector + body + end.
pub const MAX_REQUEST_SIZE: usize = HEADER_LEN + 1 + MAX_REQUEST_BODY + 1;

/// Encoded request frame, ready to write.
pub type RequestBuffer = ArrayVec<u8, MAX_REQUEST_SIZE>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Last byte of the frame was not `0xCD`.
    #[error("missing frame end: found {found:#04x}")]
    MissingEnd { found: u8 },
    /// Body window does not match the length announced in the header.
    #[error("length mismatch: expected {expected} bytes, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// Request body does not fit the request buffer.
    #[error("request too large: needed {needed}, capacity {capacity}")]
    RequestTooLarge { needed: usize, capacity: usize },
}

/// Decoded 4-byte frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub tag: u8,
    /// Payload length, excluding the end byte.
    pub length: u16,
    pub packet_type: u8,
}

impl FrameHeader {
    /// Number of bytes still to read after the header (payload + end byte).
    pub fn body_len(&self) -> usize {
        self.length as usize + 1
    }

    pub fn bytes(&self) -> [u8; HEADER_LEN] {
        let len = self.length.to_le_bytes();
        [self.tag, len[0], len[1], self.packet_type]
    }
}

/// Encodes `[tag, len_lo, len_hi, type, selector, body.., 0xCD]`.
///
/// `len` counts the selector byte plus the body.
pub fn encode_request(
    tag: u8,
    packet_type: u8,
    selector: u8,
    body: &[u8],
) -> Result<RequestBuffer, FrameError> {
    if body.len() > MAX_REQUEST_BODY {
        return Err(FrameError::RequestTooLarge {
            needed: HEADER_LEN + 1 + body.len() + 1,
            capacity: MAX_REQUEST_SIZE,
        });
    }

    let header = FrameHeader {
        tag,
        length: (1 + body.len()) as u16,
        packet_type,
    };

    let mut buf = RequestBuffer::new();
    // Capacity was checked above, none of these can fail.
    buf.extend(header.bytes());
    buf.push(selector);
    buf.extend(body.iter().copied());
    buf.push(FRAME_END);
    Ok(buf)
}

/// Register write: selector `addr`, body `le32(value)`.
pub fn write_request(addr: u8, value: u32) -> Result<RequestBuffer, FrameError> {
    encode_request(
        REQUEST_START,
        PacketType::WriteRequest.as_u8(),
        addr,
        &value.to_le_bytes(),
    )
}

/// Register read: selector `addr`, no body.
pub fn read_request(addr: u8) -> Result<RequestBuffer, FrameError> {
    encode_request(REQUEST_START, PacketType::ReadRequest.as_u8(), addr, &[])
}

/// Buffer read: selector `0xE8`, body `le16(offset)`.
pub fn buffer_request(offset: u16) -> Result<RequestBuffer, FrameError> {
    encode_request(
        REQUEST_START,
        PacketType::BufferRequest.as_u8(),
        BUFFER_SUB_ID,
        &offset.to_le_bytes(),
    )
}

/// Decodes the 4-byte header. Never fails: any tag and type are accepted.
pub fn decode_header(bytes: &[u8; HEADER_LEN]) -> FrameHeader {
    FrameHeader {
        tag: bytes[0],
        length: u16::from_le_bytes([bytes[1], bytes[2]]),
        packet_type: bytes[3],
    }
}

/// Validates the `length + 1` bytes that follow a header and returns the payload.
pub fn decode_body<'a>(header: &FrameHeader, body: &'a [u8]) -> Result<&'a [u8], FrameError> {
    if body.len() != header.body_len() {
        return Err(FrameError::LengthMismatch {
            expected: header.body_len(),
            found: body.len(),
        });
    }
    match body.split_last() {
        Some((&FRAME_END, payload)) => Ok(payload),
        Some((&found, _)) => Err(FrameError::MissingEnd { found }),
        None => Err(FrameError::LengthMismatch {
            expected: header.body_len(),
            found: 0,
        }),
    }
}
