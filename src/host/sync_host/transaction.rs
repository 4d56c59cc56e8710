// src/host/sync_host/transaction.rs

use super::{Payload, SyncHost};
use crate::common::{
    error::ModuleError,
    frame::{decode_body, decode_header, FrameHeader, HEADER_LEN},
    hal_traits::{ModuleSerial, ModuleTimer},
    register::PacketType,
};
use alloc::vec;
use log::{debug, trace, warn};

impl<IF> SyncHost<IF>
where
    IF: ModuleSerial + ModuleTimer,
{
    /// Reads one complete frame: the 4-byte header, then `length + 1` bytes
    /// of payload and end marker.
    pub fn read_one_frame(&mut self) -> Result<(FrameHeader, Payload), ModuleError<IF::Error>> {
        let mut head = [0u8; HEADER_LEN];
        self.read_exact(&mut head)?;
        let header = decode_header(&head);

        let mut body = vec![0u8; header.body_len()];
        self.read_exact(&mut body)?;
        let payload_len = decode_body(&header, &body)?.len();
        body.truncate(payload_len);

        trace!(
            "rx frame tag={:#04x} type={:#04x} len={}",
            header.tag,
            header.packet_type,
            header.length
        );
        Ok((header, body))
    }

    /// Reads frames until one of type `expected` arrives. Frames of any
    /// other type are dropped.
    ///
    /// With no `max_discarded_frames` cap this keeps going for as long as
    /// foreign frames keep arriving; only each individual read is bounded.
    pub fn read_frame_of_type(
        &mut self,
        expected: PacketType,
    ) -> Result<(FrameHeader, Payload), ModuleError<IF::Error>> {
        let mut discarded = 0usize;
        loop {
            let (header, payload) = self.read_one_frame()?;
            if header.packet_type == expected.as_u8() {
                return Ok((header, payload));
            }

            discarded += 1;
            debug!(
                "discarding frame type {:#04x} while waiting for {:?}",
                header.packet_type, expected
            );
            if let Some(max) = self.config.max_discarded_frames {
                if discarded > max {
                    warn!("no {:?} reply after {} foreign frames", expected, discarded);
                    return Err(ModuleError::TooManyDiscardedFrames { discarded });
                }
            }
        }
    }

    /// Writes `request` and returns the payload of the first `expected` reply.
    pub fn send_and_await(
        &mut self,
        request: &[u8],
        expected: PacketType,
    ) -> Result<Payload, ModuleError<IF::Error>> {
        self.send_bytes(request)?;
        let (_header, payload) = self.read_frame_of_type(expected)?;
        Ok(payload)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{config::TransactionConfig, frame::FrameError};
    use crate::host::mock::{reply_frame, MockInterface};

    #[test]
    fn test_read_one_frame() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_read_data(&[0xCC, 0x03, 0x00, 0xF7, 0xE8, 0x41, 0x42, 0xCD]);
        let mut host = SyncHost::new(mock_if);

        let (header, payload) = host.read_one_frame().unwrap();
        assert_eq!(header.tag, 0xCC);
        assert_eq!(header.length, 3);
        assert_eq!(header.packet_type, 0xF7);
        assert_eq!(payload, [0xE8, 0x41, 0x42]);
        assert!(host.interface.read_queue.is_empty());
    }

    #[test]
    fn test_read_one_frame_any_tag() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_read_data(&[0x00, 0x01, 0x00, 0xF5, 0x03, 0xCD]);
        let mut host = SyncHost::new(mock_if);
        let (header, payload) = host.read_one_frame().unwrap();
        assert_eq!(header.tag, 0x00);
        assert_eq!(payload, [0x03]);
    }

    #[test]
    fn test_read_one_frame_corrupt_terminator() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_read_data(&[0xCC, 0x01, 0x00, 0xF5, 0x03, 0xCC]);
        let mut host = SyncHost::new(mock_if);
        let result = host.read_one_frame();
        assert!(matches!(
            result,
            Err(ModuleError::Framing(FrameError::MissingEnd { found: 0xCC }))
        ));
    }

    #[test]
    fn test_read_one_frame_truncated_body_times_out() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_read_data(&[0xCC, 0x04, 0x00, 0xF6, 0x06]);
        let mut host = SyncHost::new(mock_if);
        assert!(matches!(host.read_one_frame(), Err(ModuleError::Timeout)));
    }

    #[test]
    fn test_read_frame_of_type_skips_foreign_frames() {
        let mut mock_if = MockInterface::new();
        let foreign = [
            reply_frame(0xFE, &[1, 2, 3, 4]),
            reply_frame(0xF5, &[0x03]),
            reply_frame(0xF7, &[0xE8]),
        ];
        for frame in &foreign {
            mock_if.stage_read_data(frame);
        }
        let wanted = reply_frame(0xF6, &[0x06, 0x00, 0x01, 0x00, 0x00]);
        mock_if.stage_read_data(&wanted);
        // Must stay unread
        let trailing = reply_frame(0xF6, &[0x07, 0, 0, 0, 0]);
        mock_if.stage_read_data(&trailing);

        let mut host = SyncHost::new(mock_if);
        let (header, payload) = host.read_frame_of_type(PacketType::ReadReply).unwrap();

        assert_eq!(header.packet_type, 0xF6);
        assert_eq!(payload, [0x06, 0x00, 0x01, 0x00, 0x00]);

        // N foreign frames + 1 match read, byte for byte, nothing more
        let consumed: usize = foreign.iter().map(|f| f.len()).sum::<usize>() + wanted.len();
        assert_eq!(host.interface.read_calls, consumed);
        assert_eq!(host.interface.read_queue.len(), trailing.len());
    }

    #[test]
    fn test_read_frame_of_type_discard_cap() {
        let mut mock_if = MockInterface::new();
        for _ in 0..3 {
            mock_if.stage_read_data(&reply_frame(0xFE, &[0xAA]));
        }
        mock_if.stage_read_data(&reply_frame(0xF5, &[0x03]));
        let config = TransactionConfig {
            max_discarded_frames: Some(2),
            ..TransactionConfig::default()
        };
        let mut host = SyncHost::with_config(mock_if, config);

        let result = host.read_frame_of_type(PacketType::WriteAck);
        assert!(matches!(
            result,
            Err(ModuleError::TooManyDiscardedFrames { discarded: 3 })
        ));
    }

    #[test]
    fn test_read_frame_of_type_within_cap() {
        let mut mock_if = MockInterface::new();
        for _ in 0..2 {
            mock_if.stage_read_data(&reply_frame(0xFE, &[0xAA]));
        }
        mock_if.stage_read_data(&reply_frame(0xF5, &[0x03]));
        let config = TransactionConfig {
            max_discarded_frames: Some(2),
            ..TransactionConfig::default()
        };
        let mut host = SyncHost::with_config(mock_if, config);

        let (_, payload) = host.read_frame_of_type(PacketType::WriteAck).unwrap();
        assert_eq!(payload, [0x03]);
    }

    #[test]
    fn test_send_and_await() {
        let mut mock_if = MockInterface::new();
        mock_if.stage_read_data(&reply_frame(0xF5, &[0x03]));
        let mut host = SyncHost::new(mock_if);

        let request = [0xCC, 0x05, 0x00, 0xF9, 0x03, 0x00, 0x00, 0x00, 0x00, 0xCD];
        let payload = host.send_and_await(&request, PacketType::WriteAck).unwrap();
        assert_eq!(payload, [0x03]);
        assert_eq!(host.interface.write_log, request);
    }
}
