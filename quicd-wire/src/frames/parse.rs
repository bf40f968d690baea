//! # Frame Parser (RFC 9000 Section 12.4)
//!
//! Walks a decrypted packet payload one frame at a time. PADDING is skipped
//! wherever a frame may start. Each type code is classified, checked against
//! the enabled extensions and the packet's encryption level, and only then
//! is the body decoded, so a forbidden frame is never partially parsed.
//!
//! STREAM, ACK and DATAGRAM have dedicated entry points. Callers on the hot
//! path peek the type, branch on it, and call the specialized decoder
//! directly; [`FrameParser::decode_next`] composes the same steps for
//! everyone else.
//!
//! ## ACK storage
//!
//! The parser owns a single [`AckFrame`] that every ACK decode overwrites.
//! The reference handed out borrows the parser mutably, so it cannot outlive
//! the next decode. Clone it to keep it longer.

#![forbid(unsafe_code)]

use tracing::{debug, trace};

use crate::config::{FrameParserConfig, DEFAULT_ACK_DELAY_EXPONENT};
use crate::error::{Error, Result};
use crate::types::{EncryptionLevel, StreamDirection};
use crate::varint;
use crate::version::Version;

use super::ack::AckFrame;
use super::frame_type::{FrameType, FRAME_TYPE_PADDING};
use super::types::*;

/// Per-connection frame parser.
///
/// Not meant to be shared: every decode that touches the ACK storage takes
/// `&mut self`.
#[derive(Debug, Clone)]
pub struct FrameParser {
    supports_datagrams: bool,
    supports_reset_stream_at: bool,
    ack_delay_exponent: u8,
    ack_frame: AckFrame,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new(false, false)
    }
}

impl FrameParser {
    /// Create a parser with the given extensions enabled and the default ACK
    /// delay exponent.
    pub fn new(supports_datagrams: bool, supports_reset_stream_at: bool) -> Self {
        Self {
            supports_datagrams,
            supports_reset_stream_at,
            ack_delay_exponent: DEFAULT_ACK_DELAY_EXPONENT,
            ack_frame: AckFrame::default(),
        }
    }

    /// Create a parser from a validated configuration.
    pub fn from_config(config: &FrameParserConfig) -> core::result::Result<Self, Vec<String>> {
        config.validate()?;
        let mut parser = Self::new(config.enable_datagrams, config.enable_reset_stream_at);
        parser.ack_delay_exponent = config.ack_delay_exponent;
        Ok(parser)
    }

    pub fn datagrams_enabled(&self) -> bool {
        self.supports_datagrams
    }

    pub fn reset_stream_at_enabled(&self) -> bool {
        self.supports_reset_stream_at
    }

    pub fn ack_delay_exponent(&self) -> u8 {
        self.ack_delay_exponent
    }

    /// Set the peer's `ack_delay_exponent` transport parameter.
    ///
    /// Only 1-RTT ACK frames are scaled with it; Initial and Handshake ACKs
    /// always use the default of 3.
    pub fn set_ack_delay_exponent(&mut self, exponent: u8) {
        trace!(
            old = self.ack_delay_exponent,
            new = exponent,
            "ack delay exponent updated"
        );
        self.ack_delay_exponent = exponent;
    }

    /// Whether an extension frame type has been enabled on this parser.
    fn is_enabled(&self, frame_type: FrameType) -> bool {
        match frame_type {
            FrameType::DatagramNoLength | FrameType::DatagramWithLength => self.supports_datagrams,
            FrameType::ResetStreamAt => self.supports_reset_stream_at,
            _ => true,
        }
    }

    /// Skip PADDING and read the next type code.
    ///
    /// Returns the bytes consumed (padding plus type code) and the frame
    /// type, or `None` once the region is exhausted.
    fn read_type(&self, data: &[u8], level: EncryptionLevel) -> Result<(usize, Option<FrameType>)> {
        let mut pos = 0;
        while pos < data.len() {
            let (code, len) = varint::decode(&data[pos..])?;
            pos += len;
            if code == FRAME_TYPE_PADDING {
                continue;
            }

            let frame_type = FrameType::from_code(code)
                .filter(|t| self.is_enabled(*t))
                .ok_or(Error::UnknownFrameType { frame_type: code })?;
            if !frame_type.is_allowed_at(level) {
                return Err(Error::NotAllowed {
                    frame_type: code,
                    level,
                });
            }
            return Ok((pos, Some(frame_type)));
        }
        Ok((pos, None))
    }

    /// Classify the next frame without decoding its body.
    ///
    /// Returns the frame type and the bytes consumed up to the start of the
    /// body (leading PADDING plus the type code), or `None` if `data` is
    /// empty or holds only PADDING. Unknown types, extension types that are
    /// not enabled, and types forbidden at `level` are errors.
    pub fn peek_type(
        &self,
        data: &[u8],
        level: EncryptionLevel,
    ) -> Result<Option<(FrameType, usize)>> {
        match self.read_type(data, level) {
            Ok((consumed, frame_type)) => Ok(frame_type.map(|t| (t, consumed))),
            Err(e) => {
                debug!(%level, error = %e, frame_type = ?e.frame_type(), "rejected frame type");
                Err(e)
            }
        }
    }

    /// Decode every frame type except STREAM, ACK and DATAGRAM.
    ///
    /// `data` starts after the type code. Those three types, and extension
    /// types that are not enabled, yield [`Error::UnknownFrameType`].
    pub fn decode_uncommon<'a>(
        &self,
        frame_type: FrameType,
        data: &'a [u8],
        version: Version,
    ) -> Result<(Frame<'a>, usize)> {
        let decoded = match frame_type {
            FrameType::Ping => (Frame::Ping, 0),
            FrameType::HandshakeDone => (Frame::HandshakeDone, 0),
            FrameType::ResetStream => {
                let (f, n) = ResetStreamFrame::decode(data, false, version)?;
                (Frame::ResetStream(f), n)
            }
            FrameType::ResetStreamAt if self.supports_reset_stream_at => {
                let (f, n) = ResetStreamFrame::decode(data, true, version)?;
                (Frame::ResetStream(f), n)
            }
            FrameType::StopSending => {
                let (f, n) = StopSendingFrame::decode(data, version)?;
                (Frame::StopSending(f), n)
            }
            FrameType::Crypto => {
                let (f, n) = CryptoFrame::decode(data, version)?;
                (Frame::Crypto(f), n)
            }
            FrameType::NewToken => {
                let (f, n) = NewTokenFrame::decode(data, version)?;
                (Frame::NewToken(f), n)
            }
            FrameType::MaxData => {
                let (f, n) = MaxDataFrame::decode(data, version)?;
                (Frame::MaxData(f), n)
            }
            FrameType::MaxStreamData => {
                let (f, n) = MaxStreamDataFrame::decode(data, version)?;
                (Frame::MaxStreamData(f), n)
            }
            FrameType::MaxStreamsBidi => {
                let (f, n) =
                    MaxStreamsFrame::decode(StreamDirection::Bidirectional, data, version)?;
                (Frame::MaxStreams(f), n)
            }
            FrameType::MaxStreamsUni => {
                let (f, n) =
                    MaxStreamsFrame::decode(StreamDirection::Unidirectional, data, version)?;
                (Frame::MaxStreams(f), n)
            }
            FrameType::DataBlocked => {
                let (f, n) = DataBlockedFrame::decode(data, version)?;
                (Frame::DataBlocked(f), n)
            }
            FrameType::StreamDataBlocked => {
                let (f, n) = StreamDataBlockedFrame::decode(data, version)?;
                (Frame::StreamDataBlocked(f), n)
            }
            FrameType::StreamsBlockedBidi => {
                let (f, n) =
                    StreamsBlockedFrame::decode(StreamDirection::Bidirectional, data, version)?;
                (Frame::StreamsBlocked(f), n)
            }
            FrameType::StreamsBlockedUni => {
                let (f, n) =
                    StreamsBlockedFrame::decode(StreamDirection::Unidirectional, data, version)?;
                (Frame::StreamsBlocked(f), n)
            }
            FrameType::NewConnectionId => {
                let (f, n) = NewConnectionIdFrame::decode(data, version)?;
                (Frame::NewConnectionId(f), n)
            }
            FrameType::RetireConnectionId => {
                let (f, n) = RetireConnectionIdFrame::decode(data, version)?;
                (Frame::RetireConnectionId(f), n)
            }
            FrameType::PathChallenge => {
                let (f, n) = PathChallengeFrame::decode(data, version)?;
                (Frame::PathChallenge(f), n)
            }
            FrameType::PathResponse => {
                let (f, n) = PathResponseFrame::decode(data, version)?;
                (Frame::PathResponse(f), n)
            }
            FrameType::ConnectionClose => {
                let (f, n) = ConnectionCloseFrame::decode(false, data, version)?;
                (Frame::ConnectionClose(f), n)
            }
            FrameType::ApplicationClose => {
                let (f, n) = ConnectionCloseFrame::decode(true, data, version)?;
                (Frame::ConnectionClose(f), n)
            }
            FrameType::ResetStreamAt
            | FrameType::Stream(_)
            | FrameType::Ack
            | FrameType::AckEcn
            | FrameType::DatagramNoLength
            | FrameType::DatagramWithLength => {
                return Err(Error::UnknownFrameType {
                    frame_type: frame_type.code(),
                })
            }
        };
        Ok(decoded)
    }

    /// Decode an ACK or ACK_ECN body into the parser's ACK storage.
    ///
    /// The configured delay exponent applies at 1-RTT only. The returned
    /// reference is overwritten by the next ACK decode.
    pub fn decode_ack(
        &mut self,
        frame_type: FrameType,
        data: &[u8],
        level: EncryptionLevel,
        version: Version,
    ) -> Result<(&AckFrame, usize)> {
        let ecn = match frame_type {
            FrameType::Ack => false,
            FrameType::AckEcn => true,
            other => {
                return Err(Error::UnknownFrameType {
                    frame_type: other.code(),
                })
            }
        };
        let exponent = if level == EncryptionLevel::OneRtt {
            self.ack_delay_exponent
        } else {
            DEFAULT_ACK_DELAY_EXPONENT
        };
        let consumed = self.ack_frame.decode_into(ecn, data, exponent, version)?;
        Ok((&self.ack_frame, consumed))
    }

    /// Decode a DATAGRAM body. Fails as unknown unless datagrams are enabled.
    pub fn decode_datagram<'a>(
        &self,
        frame_type: FrameType,
        data: &'a [u8],
        version: Version,
    ) -> Result<(DatagramFrame<'a>, usize)> {
        let data_len_present = match frame_type {
            FrameType::DatagramNoLength if self.supports_datagrams => false,
            FrameType::DatagramWithLength if self.supports_datagrams => true,
            other => {
                return Err(Error::UnknownFrameType {
                    frame_type: other.code(),
                })
            }
        };
        DatagramFrame::decode(data_len_present, data, version)
    }

    /// Decode a STREAM body. Without the LEN flag the frame takes the rest
    /// of `data`.
    pub fn decode_stream<'a>(
        &self,
        frame_type: FrameType,
        data: &'a [u8],
        version: Version,
    ) -> Result<(StreamFrame<'a>, usize)> {
        match frame_type {
            FrameType::Stream(flags) => StreamFrame::decode(flags, data, version),
            other => Err(Error::UnknownFrameType {
                frame_type: other.code(),
            }),
        }
    }

    /// Decode the next frame in `data`, skipping PADDING.
    ///
    /// Returns the bytes consumed, including padding and the type code, and
    /// the frame. When `data` is empty or holds only PADDING the result is
    /// `(padding_len, None)`.
    pub fn decode_next<'a>(
        &'a mut self,
        data: &'a [u8],
        level: EncryptionLevel,
        version: Version,
    ) -> Result<(usize, Option<Frame<'a>>)> {
        let (type_end, frame_type) = match self.peek_type(data, level)? {
            Some((frame_type, consumed)) => (consumed, frame_type),
            None => return Ok((data.len(), None)),
        };
        let body = &data[type_end..];

        let decoded = match frame_type {
            FrameType::Stream(_) => self
                .decode_stream(frame_type, body, version)
                .map(|(f, n)| (Frame::Stream(f), n)),
            FrameType::Ack | FrameType::AckEcn => self
                .decode_ack(frame_type, body, level, version)
                .map(|(f, n)| (Frame::Ack(f), n)),
            FrameType::DatagramNoLength | FrameType::DatagramWithLength => self
                .decode_datagram(frame_type, body, version)
                .map(|(f, n)| (Frame::Datagram(f), n)),
            _ => self.decode_uncommon(frame_type, body, version),
        };

        match decoded {
            Ok((frame, consumed)) => {
                trace!(%frame_type, %level, len = type_end + consumed, "decoded frame");
                Ok((type_end + consumed, Some(frame)))
            }
            Err(e) => {
                debug!(%frame_type, %level, error = %e, "failed to decode frame");
                Err(e)
            }
        }
    }

    /// Decode every frame in `data` in wire order, handing each to `f`.
    ///
    /// Stops at the first error from the codec or from `f`. Returns the
    /// number of frames decoded.
    pub fn for_each_frame<F>(
        &mut self,
        data: &[u8],
        level: EncryptionLevel,
        version: Version,
        mut f: F,
    ) -> Result<usize>
    where
        F: FnMut(Frame<'_>) -> Result<()>,
    {
        let mut pos = 0;
        let mut count = 0;
        while pos < data.len() {
            let (consumed, frame) = self.decode_next(&data[pos..], level, version)?;
            pos += consumed;
            match frame {
                Some(frame) => {
                    count += 1;
                    f(frame)?;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::ack::AckRange;
    use crate::frames::frame_type::StreamFlags;
    use crate::types::StreamId;
    use crate::version::VERSION_1;
    use std::time::Duration;

    fn append<F: WireFrame>(buf: &mut Vec<u8>, frame: &F) {
        frame.append(buf, VERSION_1).unwrap();
    }

    mod peek_tests {
        use super::*;

        #[test]
        fn test_empty_region() {
            let parser = FrameParser::new(true, true);
            assert_eq!(parser.peek_type(&[], EncryptionLevel::OneRtt).unwrap(), None);
        }

        #[test]
        fn test_padding_only() {
            let parser = FrameParser::new(true, true);
            assert_eq!(parser.peek_type(&[0, 0, 0], EncryptionLevel::OneRtt).unwrap(), None);
        }

        #[test]
        fn test_skips_padding() {
            let parser = FrameParser::new(false, false);
            let (frame_type, consumed) = parser
                .peek_type(&[0x00, 0x00, 0x01, 0x01], EncryptionLevel::Initial)
                .unwrap()
                .unwrap();
            assert_eq!(frame_type, FrameType::Ping);
            assert_eq!(consumed, 3);
        }

        #[test]
        fn test_multi_byte_type_code() {
            // 0x1e encoded on two bytes is still HANDSHAKE_DONE
            let parser = FrameParser::default();
            let (frame_type, consumed) = parser
                .peek_type(&[0x40, 0x1e], EncryptionLevel::OneRtt)
                .unwrap()
                .unwrap();
            assert_eq!(frame_type, FrameType::HandshakeDone);
            assert_eq!(consumed, 2);
        }

        #[test]
        fn test_extension_gating() {
            let disabled = FrameParser::new(false, false);
            for code in [0x24u8, 0x30, 0x31] {
                assert_eq!(
                    disabled.peek_type(&[code], EncryptionLevel::OneRtt),
                    Err(Error::UnknownFrameType {
                        frame_type: code as u64
                    })
                );
            }

            let enabled = FrameParser::new(true, true);
            assert_eq!(
                enabled.peek_type(&[0x24], EncryptionLevel::OneRtt).unwrap(),
                Some((FrameType::ResetStreamAt, 1))
            );
            assert_eq!(
                enabled.peek_type(&[0x30], EncryptionLevel::ZeroRtt).unwrap(),
                Some((FrameType::DatagramNoLength, 1))
            );
        }

        #[test]
        fn test_level_violation() {
            let parser = FrameParser::new(true, true);
            assert_eq!(
                parser.peek_type(&[0x1e], EncryptionLevel::Handshake),
                Err(Error::NotAllowed {
                    frame_type: 0x1e,
                    level: EncryptionLevel::Handshake
                })
            );
            assert!(parser.peek_type(&[0x08], EncryptionLevel::Initial).is_err());
            assert!(parser.peek_type(&[0x06], EncryptionLevel::ZeroRtt).is_err());
        }

        #[test]
        fn test_truncated_type_code() {
            let parser = FrameParser::default();
            assert_eq!(
                parser.peek_type(&[0x00, 0x40], EncryptionLevel::OneRtt),
                Err(Error::Truncated { frame_type: None })
            );
        }

        #[test]
        fn test_unknown_code_reads_whole_varint() {
            let parser = FrameParser::default();
            assert_eq!(
                parser.peek_type(&[0x42, 0x01], EncryptionLevel::OneRtt),
                Err(Error::UnknownFrameType { frame_type: 0x201 })
            );
            assert_eq!(
                parser.peek_type(&[0x40, 0x42], EncryptionLevel::OneRtt),
                Err(Error::UnknownFrameType { frame_type: 0x42 })
            );
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn test_uncommon_refuses_hot_path_types() {
            let parser = FrameParser::new(true, true);
            let hot = [
                FrameType::Stream(StreamFlags::default()),
                FrameType::Ack,
                FrameType::AckEcn,
                FrameType::DatagramNoLength,
                FrameType::DatagramWithLength,
            ];
            for frame_type in hot {
                let err = parser.decode_uncommon(frame_type, &[0; 16], VERSION_1).unwrap_err();
                assert_eq!(err.frame_type(), Some(frame_type.code()));
                assert!(err.is_unknown_frame_type());
            }
        }

        #[test]
        fn test_uncommon_reset_stream_at_gating() {
            let body = [0x04, 0x00, 0x0a, 0x05];
            let disabled = FrameParser::new(false, false);
            assert_eq!(
                disabled.decode_uncommon(FrameType::ResetStreamAt, &body, VERSION_1),
                Err(Error::UnknownFrameType { frame_type: 0x24 })
            );

            let enabled = FrameParser::new(false, true);
            let (frame, consumed) = enabled
                .decode_uncommon(FrameType::ResetStreamAt, &body, VERSION_1)
                .unwrap();
            assert_eq!(consumed, 4);
            let Frame::ResetStream(reset) = frame else {
                panic!("expected RESET_STREAM_AT, got {:?}", frame);
            };
            assert_eq!(reset.reliable_size, Some(5));
        }

        #[test]
        fn test_ping_and_handshake_done_consume_nothing() {
            let parser = FrameParser::default();
            assert_eq!(
                parser.decode_uncommon(FrameType::Ping, &[0xff], VERSION_1).unwrap(),
                (Frame::Ping, 0)
            );
            assert_eq!(
                parser
                    .decode_uncommon(FrameType::HandshakeDone, &[], VERSION_1)
                    .unwrap(),
                (Frame::HandshakeDone, 0)
            );
        }

        #[test]
        fn test_uncommon_empty_body_is_truncated() {
            let parser = FrameParser::default();
            let err = parser
                .decode_uncommon(FrameType::MaxStreamData, &[], VERSION_1)
                .unwrap_err();
            assert_eq!(
                err,
                Error::Truncated {
                    frame_type: Some(0x11)
                }
            );
        }

        #[test]
        fn test_specialized_decoders_check_type() {
            let mut parser = FrameParser::new(true, true);
            assert!(parser
                .decode_stream(FrameType::Crypto, &[0x00], VERSION_1)
                .is_err());
            assert!(parser
                .decode_datagram(FrameType::Ping, &[0x00], VERSION_1)
                .is_err());
            assert!(parser
                .decode_ack(FrameType::Ping, &[0x00], EncryptionLevel::OneRtt, VERSION_1)
                .is_err());
        }

        #[test]
        fn test_datagram_gating() {
            let disabled = FrameParser::new(false, true);
            assert_eq!(
                disabled.decode_datagram(FrameType::DatagramWithLength, &[0x01, 0xaa], VERSION_1),
                Err(Error::UnknownFrameType { frame_type: 0x31 })
            );
            let enabled = FrameParser::new(true, false);
            let (frame, consumed) = enabled
                .decode_datagram(FrameType::DatagramWithLength, &[0x01, 0xaa, 0xbb], VERSION_1)
                .unwrap();
            assert_eq!(frame.data, &[0xaa]);
            assert_eq!(consumed, 2);
        }
    }

    mod ack_tests {
        use super::*;

        fn ack_body(delay: Duration) -> Vec<u8> {
            let frame = AckFrame::with_ranges(&[AckRange::new(1, 1)], delay);
            let mut buf = Vec::new();
            append(&mut buf, &frame);
            buf.split_off(1)
        }

        #[test]
        fn test_exponent_applies_only_at_one_rtt() {
            let mut parser = FrameParser::default();
            parser.set_ack_delay_exponent(DEFAULT_ACK_DELAY_EXPONENT + 2);
            let body = ack_body(Duration::from_secs(1));

            let (ack, _) = parser
                .decode_ack(FrameType::Ack, &body, EncryptionLevel::OneRtt, VERSION_1)
                .unwrap();
            assert_eq!(ack.delay, Duration::from_secs(4));

            for level in [EncryptionLevel::Initial, EncryptionLevel::Handshake] {
                let (ack, _) = parser
                    .decode_ack(FrameType::Ack, &body, level, VERSION_1)
                    .unwrap();
                assert_eq!(ack.delay, Duration::from_secs(1));
            }
        }

        #[test]
        fn test_storage_is_overwritten() {
            let mut parser = FrameParser::default();
            let first = [0x13, 0x00, 0x01, 0x01, 0x02, 0x03];
            let (ack, _) = parser
                .decode_ack(FrameType::Ack, &first, EncryptionLevel::OneRtt, VERSION_1)
                .unwrap();
            let kept = ack.clone();
            assert_eq!(kept.ranges.len(), 2);

            let second = [0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
            let (ack, consumed) = parser
                .decode_ack(FrameType::AckEcn, &second, EncryptionLevel::OneRtt, VERSION_1)
                .unwrap();
            assert_eq!(consumed, 7);
            assert_eq!(&ack.ranges[..], &[AckRange::new(5, 5)]);
            assert!(ack.ecn_counts.is_some());
            assert_eq!(kept.largest_acked(), 0x13);
        }
    }

    mod decode_next_tests {
        use super::*;

        #[test]
        fn test_empty_and_padding_only() {
            let mut parser = FrameParser::default();
            assert_eq!(
                parser.decode_next(&[], EncryptionLevel::OneRtt, VERSION_1).unwrap(),
                (0, None)
            );
            assert_eq!(
                parser
                    .decode_next(&[0, 0, 0], EncryptionLevel::OneRtt, VERSION_1)
                    .unwrap(),
                (3, None)
            );
        }

        #[test]
        fn test_consumed_includes_padding_and_type() {
            let mut parser = FrameParser::default();
            let buf = [0x00, 0x00, 0x10, 0x44, 0x00, 0x01];
            let (consumed, frame) = parser
                .decode_next(&buf, EncryptionLevel::OneRtt, VERSION_1)
                .unwrap();
            assert_eq!(consumed, 5);
            assert_eq!(
                frame,
                Some(Frame::MaxData(MaxDataFrame {
                    maximum_data: 0x400
                }))
            );
        }

        #[test]
        fn test_level_checked_before_body() {
            // MAX_DATA with a truncated body at Initial is reported as a
            // level violation, not as truncation.
            let mut parser = FrameParser::default();
            let err = parser
                .decode_next(&[0x10, 0x40], EncryptionLevel::Initial, VERSION_1)
                .unwrap_err();
            assert_eq!(
                err,
                Error::NotAllowed {
                    frame_type: 0x10,
                    level: EncryptionLevel::Initial
                }
            );
        }

        #[test]
        fn test_stream_without_length_takes_rest() {
            let mut parser = FrameParser::default();
            let frame = StreamFrame {
                stream_id: StreamId::new(4),
                offset: 0,
                fin: true,
                data_len_present: false,
                data: b"tail",
            };
            let mut buf = vec![0x00];
            append(&mut buf, &frame);
            let (consumed, decoded) = parser
                .decode_next(&buf, EncryptionLevel::ZeroRtt, VERSION_1)
                .unwrap();
            assert_eq!(consumed, buf.len());
            assert_eq!(decoded, Some(Frame::Stream(frame)));
        }

        #[test]
        fn test_zero_offset_reports_canonical_kind() {
            // STREAM with OFF|LEN and an explicit zero offset
            let buf = [0x0e, 0x04, 0x00, 0x01, 0xaa];
            let mut parser = FrameParser::default();
            let (consumed, frame) = parser
                .decode_next(&buf, EncryptionLevel::OneRtt, VERSION_1)
                .unwrap();
            let frame = frame.unwrap();
            assert_eq!(consumed, 5);
            assert_eq!(frame.kind(), FrameType::from_code(0x0a));
            assert_eq!(frame.wire_len(VERSION_1), 4);
        }

        #[test]
        fn test_error_carries_frame_type() {
            let mut parser = FrameParser::default();
            let err = parser
                .decode_next(&[0x07, 0x00], EncryptionLevel::OneRtt, VERSION_1)
                .unwrap_err();
            assert_eq!(err.frame_type(), Some(0x07));
            assert_eq!(err.code().code(), 0x07);
        }
    }

    mod for_each_tests {
        use super::*;

        #[test]
        fn test_frames_in_wire_order() {
            let mut buf = Vec::new();
            append(&mut buf, &Frame::Ping);
            append(&mut buf, &AckFrame::with_ranges(&[AckRange::new(3, 7)], Duration::ZERO));
            buf.extend_from_slice(&[0, 0]);
            append(
                &mut buf,
                &CryptoFrame {
                    offset: 0,
                    data: b"hello",
                },
            );
            buf.extend_from_slice(&[0, 0, 0]);

            let mut parser = FrameParser::default();
            let mut seen = Vec::new();
            let count = parser
                .for_each_frame(&buf, EncryptionLevel::Handshake, VERSION_1, |frame| {
                    seen.push(WireFrame::frame_type(&frame));
                    if let Frame::Ack(ack) = frame {
                        assert_eq!(ack.largest_acked(), 7);
                    }
                    Ok(())
                })
                .unwrap();
            assert_eq!(count, 3);
            assert_eq!(seen, vec![0x01, 0x02, 0x06]);
        }

        #[test]
        fn test_stops_on_error() {
            let mut buf = Vec::new();
            append(&mut buf, &Frame::Ping);
            // 0x42 on two bytes; a lone 0x42 would start a two-byte varint
            buf.extend_from_slice(&[0x40, 0x42]);
            append(&mut buf, &Frame::Ping);

            let mut parser = FrameParser::default();
            let mut count = 0;
            let err = parser
                .for_each_frame(&buf, EncryptionLevel::OneRtt, VERSION_1, |_| {
                    count += 1;
                    Ok(())
                })
                .unwrap_err();
            assert_eq!(err, Error::UnknownFrameType { frame_type: 0x42 });
            assert_eq!(count, 1);
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_from_config() {
            let config = FrameParserConfig {
                enable_datagrams: true,
                enable_reset_stream_at: false,
                ack_delay_exponent: 7,
            };
            let parser = FrameParser::from_config(&config).unwrap();
            assert!(parser.datagrams_enabled());
            assert!(!parser.reset_stream_at_enabled());
            assert_eq!(parser.ack_delay_exponent(), 7);
        }

        #[test]
        fn test_from_invalid_config() {
            let config = FrameParserConfig {
                ack_delay_exponent: 21,
                ..FrameParserConfig::default()
            };
            assert!(FrameParser::from_config(&config).is_err());
        }

        #[test]
        fn test_default_parser() {
            let parser = FrameParser::default();
            assert!(!parser.datagrams_enabled());
            assert!(!parser.reset_stream_at_enabled());
            assert_eq!(parser.ack_delay_exponent(), DEFAULT_ACK_DELAY_EXPONENT);
        }
    }
}
