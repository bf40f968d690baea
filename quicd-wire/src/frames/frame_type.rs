//! # Frame Types (RFC 9000 Section 12.4, Table 3)
//!
//! Maps wire type codes to [`FrameType`] and encodes which frame types are
//! permitted at which encryption level. Classification and admissibility are
//! separate so that a known-but-forbidden frame is reported differently from
//! an unknown one.

#![forbid(unsafe_code)]

use core::fmt;

use crate::types::{EncryptionLevel, StreamDirection};

/// Frame Type Constants (RFC 9000 Section 19, RFC 9221, reliable reset)
pub const FRAME_TYPE_PADDING: u64 = 0x00;
pub const FRAME_TYPE_PING: u64 = 0x01;
pub const FRAME_TYPE_ACK: u64 = 0x02;
pub const FRAME_TYPE_ACK_ECN: u64 = 0x03;
pub const FRAME_TYPE_RESET_STREAM: u64 = 0x04;
pub const FRAME_TYPE_STOP_SENDING: u64 = 0x05;
pub const FRAME_TYPE_CRYPTO: u64 = 0x06;
pub const FRAME_TYPE_NEW_TOKEN: u64 = 0x07;
pub const FRAME_TYPE_STREAM: u64 = 0x08; // 0x08-0x0f
pub const FRAME_TYPE_MAX_DATA: u64 = 0x10;
pub const FRAME_TYPE_MAX_STREAM_DATA: u64 = 0x11;
pub const FRAME_TYPE_MAX_STREAMS_BIDI: u64 = 0x12;
pub const FRAME_TYPE_MAX_STREAMS_UNI: u64 = 0x13;
pub const FRAME_TYPE_DATA_BLOCKED: u64 = 0x14;
pub const FRAME_TYPE_STREAM_DATA_BLOCKED: u64 = 0x15;
pub const FRAME_TYPE_STREAMS_BLOCKED_BIDI: u64 = 0x16;
pub const FRAME_TYPE_STREAMS_BLOCKED_UNI: u64 = 0x17;
pub const FRAME_TYPE_NEW_CONNECTION_ID: u64 = 0x18;
pub const FRAME_TYPE_RETIRE_CONNECTION_ID: u64 = 0x19;
pub const FRAME_TYPE_PATH_CHALLENGE: u64 = 0x1a;
pub const FRAME_TYPE_PATH_RESPONSE: u64 = 0x1b;
pub const FRAME_TYPE_CONNECTION_CLOSE: u64 = 0x1c;
pub const FRAME_TYPE_APPLICATION_CLOSE: u64 = 0x1d;
pub const FRAME_TYPE_HANDSHAKE_DONE: u64 = 0x1e;
pub const FRAME_TYPE_RESET_STREAM_AT: u64 = 0x24;
pub const FRAME_TYPE_DATAGRAM: u64 = 0x30;
pub const FRAME_TYPE_DATAGRAM_WITH_LENGTH: u64 = 0x31;

/// STREAM Frame Flag Bits (RFC 9000 Section 19.8)
///
/// - Bit 0 (FIN): Last frame in stream
/// - Bit 1 (LEN): Length field present
/// - Bit 2 (OFF): Offset field present
pub const STREAM_FRAME_BIT_FIN: u8 = 0x01;
pub const STREAM_FRAME_BIT_LEN: u8 = 0x02;
pub const STREAM_FRAME_BIT_OFF: u8 = 0x04;

/// Returns true if `code` is one of the eight STREAM type codes (0x08-0x0f).
#[inline]
pub fn is_stream_frame_type(code: u64) -> bool {
    code & !0x07 == FRAME_TYPE_STREAM
}

/// Flag bits carried in the low three bits of a STREAM type code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StreamFlags(u8);

impl StreamFlags {
    pub fn new(has_offset: bool, has_length: bool, fin: bool) -> Self {
        let mut bits = 0;
        if has_offset {
            bits |= STREAM_FRAME_BIT_OFF;
        }
        if has_length {
            bits |= STREAM_FRAME_BIT_LEN;
        }
        if fin {
            bits |= STREAM_FRAME_BIT_FIN;
        }
        Self(bits)
    }

    /// Build from the low bits of a type code; higher bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & 0x07)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn has_offset(self) -> bool {
        self.0 & STREAM_FRAME_BIT_OFF != 0
    }

    pub fn has_length(self) -> bool {
        self.0 & STREAM_FRAME_BIT_LEN != 0
    }

    pub fn fin(self) -> bool {
        self.0 & STREAM_FRAME_BIT_FIN != 0
    }
}

/// Frame kind identified by a wire type code.
///
/// PADDING (0x00) is not represented: the parser skips it wherever a frame
/// is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    Ping,
    Ack,
    AckEcn,
    ResetStream,
    StopSending,
    Crypto,
    NewToken,
    Stream(StreamFlags),
    MaxData,
    MaxStreamData,
    MaxStreamsBidi,
    MaxStreamsUni,
    DataBlocked,
    StreamDataBlocked,
    StreamsBlockedBidi,
    StreamsBlockedUni,
    NewConnectionId,
    RetireConnectionId,
    PathChallenge,
    PathResponse,
    /// CONNECTION_CLOSE signalling a transport error (0x1c)
    ConnectionClose,
    /// CONNECTION_CLOSE signalling an application error (0x1d)
    ApplicationClose,
    HandshakeDone,
    ResetStreamAt,
    DatagramNoLength,
    DatagramWithLength,
}

impl FrameType {
    /// Classify a wire type code.
    ///
    /// Returns `None` for PADDING and for unassigned codes. Extension codes
    /// are classified here; whether they are accepted is up to the parser.
    pub fn from_code(code: u64) -> Option<Self> {
        if is_stream_frame_type(code) {
            return Some(FrameType::Stream(StreamFlags::from_bits(code as u8)));
        }
        let frame_type = match code {
            FRAME_TYPE_PING => FrameType::Ping,
            FRAME_TYPE_ACK => FrameType::Ack,
            FRAME_TYPE_ACK_ECN => FrameType::AckEcn,
            FRAME_TYPE_RESET_STREAM => FrameType::ResetStream,
            FRAME_TYPE_STOP_SENDING => FrameType::StopSending,
            FRAME_TYPE_CRYPTO => FrameType::Crypto,
            FRAME_TYPE_NEW_TOKEN => FrameType::NewToken,
            FRAME_TYPE_MAX_DATA => FrameType::MaxData,
            FRAME_TYPE_MAX_STREAM_DATA => FrameType::MaxStreamData,
            FRAME_TYPE_MAX_STREAMS_BIDI => FrameType::MaxStreamsBidi,
            FRAME_TYPE_MAX_STREAMS_UNI => FrameType::MaxStreamsUni,
            FRAME_TYPE_DATA_BLOCKED => FrameType::DataBlocked,
            FRAME_TYPE_STREAM_DATA_BLOCKED => FrameType::StreamDataBlocked,
            FRAME_TYPE_STREAMS_BLOCKED_BIDI => FrameType::StreamsBlockedBidi,
            FRAME_TYPE_STREAMS_BLOCKED_UNI => FrameType::StreamsBlockedUni,
            FRAME_TYPE_NEW_CONNECTION_ID => FrameType::NewConnectionId,
            FRAME_TYPE_RETIRE_CONNECTION_ID => FrameType::RetireConnectionId,
            FRAME_TYPE_PATH_CHALLENGE => FrameType::PathChallenge,
            FRAME_TYPE_PATH_RESPONSE => FrameType::PathResponse,
            FRAME_TYPE_CONNECTION_CLOSE => FrameType::ConnectionClose,
            FRAME_TYPE_APPLICATION_CLOSE => FrameType::ApplicationClose,
            FRAME_TYPE_HANDSHAKE_DONE => FrameType::HandshakeDone,
            FRAME_TYPE_RESET_STREAM_AT => FrameType::ResetStreamAt,
            FRAME_TYPE_DATAGRAM => FrameType::DatagramNoLength,
            FRAME_TYPE_DATAGRAM_WITH_LENGTH => FrameType::DatagramWithLength,
            _ => return None,
        };
        Some(frame_type)
    }

    /// Wire type code.
    pub fn code(self) -> u64 {
        match self {
            FrameType::Ping => FRAME_TYPE_PING,
            FrameType::Ack => FRAME_TYPE_ACK,
            FrameType::AckEcn => FRAME_TYPE_ACK_ECN,
            FrameType::ResetStream => FRAME_TYPE_RESET_STREAM,
            FrameType::StopSending => FRAME_TYPE_STOP_SENDING,
            FrameType::Crypto => FRAME_TYPE_CRYPTO,
            FrameType::NewToken => FRAME_TYPE_NEW_TOKEN,
            FrameType::Stream(flags) => FRAME_TYPE_STREAM | flags.bits() as u64,
            FrameType::MaxData => FRAME_TYPE_MAX_DATA,
            FrameType::MaxStreamData => FRAME_TYPE_MAX_STREAM_DATA,
            FrameType::MaxStreamsBidi => FRAME_TYPE_MAX_STREAMS_BIDI,
            FrameType::MaxStreamsUni => FRAME_TYPE_MAX_STREAMS_UNI,
            FrameType::DataBlocked => FRAME_TYPE_DATA_BLOCKED,
            FrameType::StreamDataBlocked => FRAME_TYPE_STREAM_DATA_BLOCKED,
            FrameType::StreamsBlockedBidi => FRAME_TYPE_STREAMS_BLOCKED_BIDI,
            FrameType::StreamsBlockedUni => FRAME_TYPE_STREAMS_BLOCKED_UNI,
            FrameType::NewConnectionId => FRAME_TYPE_NEW_CONNECTION_ID,
            FrameType::RetireConnectionId => FRAME_TYPE_RETIRE_CONNECTION_ID,
            FrameType::PathChallenge => FRAME_TYPE_PATH_CHALLENGE,
            FrameType::PathResponse => FRAME_TYPE_PATH_RESPONSE,
            FrameType::ConnectionClose => FRAME_TYPE_CONNECTION_CLOSE,
            FrameType::ApplicationClose => FRAME_TYPE_APPLICATION_CLOSE,
            FrameType::HandshakeDone => FRAME_TYPE_HANDSHAKE_DONE,
            FrameType::ResetStreamAt => FRAME_TYPE_RESET_STREAM_AT,
            FrameType::DatagramNoLength => FRAME_TYPE_DATAGRAM,
            FrameType::DatagramWithLength => FRAME_TYPE_DATAGRAM_WITH_LENGTH,
        }
    }

    /// Returns true for the eight STREAM variants.
    #[inline]
    pub fn is_stream(self) -> bool {
        matches!(self, FrameType::Stream(_))
    }

    /// Returns true for ACK and ACK_ECN.
    #[inline]
    pub fn is_ack(self) -> bool {
        matches!(self, FrameType::Ack | FrameType::AckEcn)
    }

    /// Returns true for both DATAGRAM codes.
    #[inline]
    pub fn is_datagram(self) -> bool {
        matches!(self, FrameType::DatagramNoLength | FrameType::DatagramWithLength)
    }

    /// Stream direction for MAX_STREAMS and STREAMS_BLOCKED, `None` otherwise.
    pub fn stream_direction(self) -> Option<StreamDirection> {
        match self {
            FrameType::MaxStreamsBidi | FrameType::StreamsBlockedBidi => {
                Some(StreamDirection::Bidirectional)
            }
            FrameType::MaxStreamsUni | FrameType::StreamsBlockedUni => {
                Some(StreamDirection::Unidirectional)
            }
            _ => None,
        }
    }

    /// Returns true if receipt of this frame obliges the peer to send an ACK
    /// (RFC 9000 Section 13.2). ACK, PADDING and CONNECTION_CLOSE are not.
    pub fn is_ack_eliciting(self) -> bool {
        !matches!(
            self,
            FrameType::Ack
                | FrameType::AckEcn
                | FrameType::ConnectionClose
                | FrameType::ApplicationClose
        )
    }

    /// Whether this frame type may appear at `level` (RFC 9000 Section 12.4).
    ///
    /// Initial and Handshake packets carry only CRYPTO, ACK, PING and
    /// transport CONNECTION_CLOSE. 0-RTT packets carry everything except
    /// frames that only make sense once the handshake has completed or that
    /// acknowledge or close at the handshake layer.
    pub fn is_allowed_at(self, level: EncryptionLevel) -> bool {
        match level {
            EncryptionLevel::Initial | EncryptionLevel::Handshake => matches!(
                self,
                FrameType::Crypto
                    | FrameType::Ack
                    | FrameType::AckEcn
                    | FrameType::ConnectionClose
                    | FrameType::Ping
            ),
            EncryptionLevel::ZeroRtt => !matches!(
                self,
                FrameType::Crypto
                    | FrameType::Ack
                    | FrameType::AckEcn
                    | FrameType::ConnectionClose
                    | FrameType::NewToken
                    | FrameType::PathResponse
                    | FrameType::RetireConnectionId
                    | FrameType::HandshakeDone
            ),
            EncryptionLevel::OneRtt => true,
        }
    }

    /// RFC name of the frame type.
    pub fn name(self) -> &'static str {
        match self {
            FrameType::Ping => "PING",
            FrameType::Ack => "ACK",
            FrameType::AckEcn => "ACK_ECN",
            FrameType::ResetStream => "RESET_STREAM",
            FrameType::StopSending => "STOP_SENDING",
            FrameType::Crypto => "CRYPTO",
            FrameType::NewToken => "NEW_TOKEN",
            FrameType::Stream(_) => "STREAM",
            FrameType::MaxData => "MAX_DATA",
            FrameType::MaxStreamData => "MAX_STREAM_DATA",
            FrameType::MaxStreamsBidi | FrameType::MaxStreamsUni => "MAX_STREAMS",
            FrameType::DataBlocked => "DATA_BLOCKED",
            FrameType::StreamDataBlocked => "STREAM_DATA_BLOCKED",
            FrameType::StreamsBlockedBidi | FrameType::StreamsBlockedUni => "STREAMS_BLOCKED",
            FrameType::NewConnectionId => "NEW_CONNECTION_ID",
            FrameType::RetireConnectionId => "RETIRE_CONNECTION_ID",
            FrameType::PathChallenge => "PATH_CHALLENGE",
            FrameType::PathResponse => "PATH_RESPONSE",
            FrameType::ConnectionClose | FrameType::ApplicationClose => "CONNECTION_CLOSE",
            FrameType::HandshakeDone => "HANDSHAKE_DONE",
            FrameType::ResetStreamAt => "RESET_STREAM_AT",
            FrameType::DatagramNoLength | FrameType::DatagramWithLength => "DATAGRAM",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:#x})", self.name(), self.code())
    }
}
