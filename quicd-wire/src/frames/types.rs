//! # QUIC Frame Types (RFC 9000 Section 19)
//!
//! Typed values for every frame kind the codec understands.
//!
//! ## Frame Classification:
//! - **ACK-eliciting**: everything except ACK, PADDING and CONNECTION_CLOSE
//! - **Non-ACK-eliciting**: ACK, CONNECTION_CLOSE, PADDING
//!
//! ## Zero-Copy Design:
//! Frames that carry byte payloads borrow them from the packet buffer they
//! were decoded from. The ACK variant of [`Frame`] borrows the parser's
//! scratch [`AckFrame`] instead.

#![forbid(unsafe_code)]

use bytes::BufMut;

use crate::error::{Error, Result};
use crate::types::{StatelessResetToken, StreamDirection, StreamId};
use crate::varint;
use crate::version::Version;

use super::ack::AckFrame;
use super::frame_type::FrameType;

/// Encoding side shared by every frame value.
///
/// `encode` writes the type code followed by the body and assumes the value
/// is representable; [`WireFrame::append`] validates and checks capacity
/// first, so nothing is written on failure.
pub trait WireFrame {
    /// Wire type code this value encodes as.
    fn frame_type(&self) -> u64;

    /// Exact encoded length including the type code.
    fn wire_len(&self, version: Version) -> usize;

    /// Write the frame. Prefer [`WireFrame::append`].
    fn encode<B: BufMut>(&self, buf: &mut B, version: Version) -> Result<()>;

    /// Reject values that cannot be represented on the wire.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Validate, check that `buf` has room, then encode.
    ///
    /// Returns the number of bytes written.
    fn append<B: BufMut>(&self, buf: &mut B, version: Version) -> Result<usize> {
        self.validate()?;
        let needed = self.wire_len(version);
        let available = buf.remaining_mut();
        if available < needed {
            return Err(Error::BufferTooSmall { needed, available });
        }
        self.encode(buf, version)?;
        Ok(needed)
    }
}

/// RESET_STREAM Frame (RFC 9000 Section 19.4)
///
/// With `reliable_size` set this is RESET_STREAM_AT (0x24): the sender
/// promises to deliver the stream up to that offset before abandoning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetStreamFrame {
    /// Stream ID being reset
    pub stream_id: StreamId,

    /// Application-defined error code
    pub error_code: u64,

    /// Final size of stream in bytes
    pub final_size: u64,

    /// Reliable size, RESET_STREAM_AT only
    pub reliable_size: Option<u64>,
}

/// STOP_SENDING Frame (RFC 9000 Section 19.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopSendingFrame {
    pub stream_id: StreamId,
    pub error_code: u64,
}

/// CRYPTO Frame (RFC 9000 Section 19.6)
///
/// Carries TLS handshake messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoFrame<'a> {
    /// Byte offset in crypto stream
    pub offset: u64,

    /// Crypto data (zero-copy reference)
    pub data: &'a [u8],
}

/// NEW_TOKEN Frame (RFC 9000 Section 19.7)
///
/// Provides a token for address validation in future connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTokenFrame<'a> {
    /// Opaque token, never empty
    pub token: &'a [u8],
}

/// STREAM Frame (RFC 9000 Section 19.8)
///
/// Carries application data on a stream. This is the primary data-carrying frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFrame<'a> {
    /// Stream ID
    pub stream_id: StreamId,

    /// Byte offset in stream (0 if OFF bit not set)
    pub offset: u64,

    /// FIN bit: indicates final frame in stream
    pub fin: bool,

    /// LEN bit: the frame carries an explicit length. Without it the data
    /// runs to the end of the packet, so the frame must be the last one.
    pub data_len_present: bool,

    /// Stream data (lifetime-bound reference to packet buffer)
    pub data: &'a [u8],
}

/// MAX_DATA Frame (RFC 9000 Section 19.9)
///
/// Informs peer of maximum data bytes it can send on entire connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxDataFrame {
    pub maximum_data: u64,
}

/// MAX_STREAM_DATA Frame (RFC 9000 Section 19.10)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxStreamDataFrame {
    pub stream_id: StreamId,
    pub maximum_stream_data: u64,
}

/// MAX_STREAMS Frame (RFC 9000 Section 19.11)
///
/// The direction selects type 0x12 (bidirectional) or 0x13 (unidirectional).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxStreamsFrame {
    pub direction: StreamDirection,
    /// Cumulative stream count, at most 2^60
    pub max_streams: u64,
}

/// DATA_BLOCKED Frame (RFC 9000 Section 19.12)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataBlockedFrame {
    pub maximum_data: u64,
}

/// STREAM_DATA_BLOCKED Frame (RFC 9000 Section 19.13)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDataBlockedFrame {
    pub stream_id: StreamId,
    pub maximum_stream_data: u64,
}

/// STREAMS_BLOCKED Frame (RFC 9000 Section 19.14)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamsBlockedFrame {
    pub direction: StreamDirection,
    pub stream_limit: u64,
}

/// NEW_CONNECTION_ID Frame (RFC 9000 Section 19.15)
///
/// Provides the peer with an alternative connection ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewConnectionIdFrame<'a> {
    /// Sequence number assigned to this connection ID
    pub sequence_number: u64,

    /// Connection IDs below this sequence number must be retired
    pub retire_prior_to: u64,

    /// Connection ID, 1 to 20 bytes
    pub connection_id: &'a [u8],

    /// Stateless reset token for this connection ID
    pub stateless_reset_token: StatelessResetToken,
}

/// RETIRE_CONNECTION_ID Frame (RFC 9000 Section 19.16)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetireConnectionIdFrame {
    pub sequence_number: u64,
}

/// PATH_CHALLENGE Frame (RFC 9000 Section 19.17)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathChallengeFrame {
    pub data: [u8; 8],
}

/// PATH_RESPONSE Frame (RFC 9000 Section 19.18)
///
/// Echoes the data of the PATH_CHALLENGE it answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathResponseFrame {
    pub data: [u8; 8],
}

/// CONNECTION_CLOSE Frame (RFC 9000 Section 19.19)
///
/// Type 0x1c signals a transport error and names the offending frame type;
/// type 0x1d signals an application error and carries no frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionCloseFrame<'a> {
    /// Application error (0x1d) or transport error (0x1c)
    pub is_application_error: bool,

    pub error_code: u64,

    /// Frame type that triggered the error (0 if unknown). Not encoded for
    /// application errors.
    pub frame_type: u64,

    /// Reason phrase, nominally UTF-8
    pub reason_phrase: &'a [u8],
}

impl<'a> ConnectionCloseFrame<'a> {
    /// Reason phrase as text, `None` if it is not valid UTF-8.
    pub fn reason(&self) -> Option<&'a str> {
        core::str::from_utf8(self.reason_phrase).ok()
    }
}

/// DATAGRAM Frame (RFC 9221 Section 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatagramFrame<'a> {
    /// Type 0x31 carries a length; 0x30 runs to the end of the packet
    pub data_len_present: bool,

    pub data: &'a [u8],
}

/// QUIC Frame (RFC 9000 Section 12.4)
///
/// PADDING never appears here; the parser skips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// PING (0x01)
    Ping,

    /// ACK (0x02) / ACK_ECN (0x03), borrowed from the parser
    Ack(&'a AckFrame),

    /// RESET_STREAM (0x04) / RESET_STREAM_AT (0x24)
    ResetStream(ResetStreamFrame),

    /// STOP_SENDING (0x05)
    StopSending(StopSendingFrame),

    /// CRYPTO (0x06)
    Crypto(CryptoFrame<'a>),

    /// NEW_TOKEN (0x07)
    NewToken(NewTokenFrame<'a>),

    /// STREAM (0x08-0x0f)
    Stream(StreamFrame<'a>),

    /// MAX_DATA (0x10)
    MaxData(MaxDataFrame),

    /// MAX_STREAM_DATA (0x11)
    MaxStreamData(MaxStreamDataFrame),

    /// MAX_STREAMS (0x12 / 0x13)
    MaxStreams(MaxStreamsFrame),

    /// DATA_BLOCKED (0x14)
    DataBlocked(DataBlockedFrame),

    /// STREAM_DATA_BLOCKED (0x15)
    StreamDataBlocked(StreamDataBlockedFrame),

    /// STREAMS_BLOCKED (0x16 / 0x17)
    StreamsBlocked(StreamsBlockedFrame),

    /// NEW_CONNECTION_ID (0x18)
    NewConnectionId(NewConnectionIdFrame<'a>),

    /// RETIRE_CONNECTION_ID (0x19)
    RetireConnectionId(RetireConnectionIdFrame),

    /// PATH_CHALLENGE (0x1a)
    PathChallenge(PathChallengeFrame),

    /// PATH_RESPONSE (0x1b)
    PathResponse(PathResponseFrame),

    /// CONNECTION_CLOSE (0x1c / 0x1d)
    ConnectionClose(ConnectionCloseFrame<'a>),

    /// HANDSHAKE_DONE (0x1e)
    HandshakeDone,

    /// DATAGRAM (0x30 / 0x31)
    Datagram(DatagramFrame<'a>),
}

impl<'a> Frame<'a> {
    /// Check if frame is ACK-eliciting (RFC 9000 Section 13.2)
    pub fn is_ack_eliciting(&self) -> bool {
        !matches!(self, Frame::Ack(_) | Frame::ConnectionClose(_))
    }

    /// Classified type of this frame's canonical encoding.
    ///
    /// For a decoded frame this can differ from the code on the wire: a
    /// STREAM frame sent with the OFF bit and a zero offset reports the code
    /// without OFF, and its `wire_len` is shorter than the bytes consumed.
    /// Use the consumed count from the decoder to advance through a packet.
    pub fn kind(&self) -> Option<FrameType> {
        FrameType::from_code(WireFrame::frame_type(self))
    }
}

impl WireFrame for Frame<'_> {
    fn frame_type(&self) -> u64 {
        match self {
            Frame::Ping => FrameType::Ping.code(),
            Frame::HandshakeDone => FrameType::HandshakeDone.code(),
            Frame::Ack(f) => f.frame_type(),
            Frame::ResetStream(f) => f.frame_type(),
            Frame::StopSending(f) => f.frame_type(),
            Frame::Crypto(f) => f.frame_type(),
            Frame::NewToken(f) => f.frame_type(),
            Frame::Stream(f) => f.frame_type(),
            Frame::MaxData(f) => f.frame_type(),
            Frame::MaxStreamData(f) => f.frame_type(),
            Frame::MaxStreams(f) => f.frame_type(),
            Frame::DataBlocked(f) => f.frame_type(),
            Frame::StreamDataBlocked(f) => f.frame_type(),
            Frame::StreamsBlocked(f) => f.frame_type(),
            Frame::NewConnectionId(f) => f.frame_type(),
            Frame::RetireConnectionId(f) => f.frame_type(),
            Frame::PathChallenge(f) => f.frame_type(),
            Frame::PathResponse(f) => f.frame_type(),
            Frame::ConnectionClose(f) => f.frame_type(),
            Frame::Datagram(f) => f.frame_type(),
        }
    }

    fn wire_len(&self, version: Version) -> usize {
        match self {
            // Single-byte type code, empty body
            Frame::Ping | Frame::HandshakeDone => 1,
            Frame::Ack(f) => f.wire_len(version),
            Frame::ResetStream(f) => f.wire_len(version),
            Frame::StopSending(f) => f.wire_len(version),
            Frame::Crypto(f) => f.wire_len(version),
            Frame::NewToken(f) => f.wire_len(version),
            Frame::Stream(f) => f.wire_len(version),
            Frame::MaxData(f) => f.wire_len(version),
            Frame::MaxStreamData(f) => f.wire_len(version),
            Frame::MaxStreams(f) => f.wire_len(version),
            Frame::DataBlocked(f) => f.wire_len(version),
            Frame::StreamDataBlocked(f) => f.wire_len(version),
            Frame::StreamsBlocked(f) => f.wire_len(version),
            Frame::NewConnectionId(f) => f.wire_len(version),
            Frame::RetireConnectionId(f) => f.wire_len(version),
            Frame::PathChallenge(f) => f.wire_len(version),
            Frame::PathResponse(f) => f.wire_len(version),
            Frame::ConnectionClose(f) => f.wire_len(version),
            Frame::Datagram(f) => f.wire_len(version),
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B, version: Version) -> Result<()> {
        match self {
            Frame::Ping | Frame::HandshakeDone => {
                varint::write(buf, WireFrame::frame_type(self))?;
                Ok(())
            }
            Frame::Ack(f) => f.encode(buf, version),
            Frame::ResetStream(f) => f.encode(buf, version),
            Frame::StopSending(f) => f.encode(buf, version),
            Frame::Crypto(f) => f.encode(buf, version),
            Frame::NewToken(f) => f.encode(buf, version),
            Frame::Stream(f) => f.encode(buf, version),
            Frame::MaxData(f) => f.encode(buf, version),
            Frame::MaxStreamData(f) => f.encode(buf, version),
            Frame::MaxStreams(f) => f.encode(buf, version),
            Frame::DataBlocked(f) => f.encode(buf, version),
            Frame::StreamDataBlocked(f) => f.encode(buf, version),
            Frame::StreamsBlocked(f) => f.encode(buf, version),
            Frame::NewConnectionId(f) => f.encode(buf, version),
            Frame::RetireConnectionId(f) => f.encode(buf, version),
            Frame::PathChallenge(f) => f.encode(buf, version),
            Frame::PathResponse(f) => f.encode(buf, version),
            Frame::ConnectionClose(f) => f.encode(buf, version),
            Frame::Datagram(f) => f.encode(buf, version),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Frame::Ping | Frame::HandshakeDone => Ok(()),
            Frame::Ack(f) => f.validate(),
            Frame::ResetStream(f) => f.validate(),
            Frame::StopSending(f) => f.validate(),
            Frame::Crypto(f) => f.validate(),
            Frame::NewToken(f) => f.validate(),
            Frame::Stream(f) => f.validate(),
            Frame::MaxData(f) => f.validate(),
            Frame::MaxStreamData(f) => f.validate(),
            Frame::MaxStreams(f) => f.validate(),
            Frame::DataBlocked(f) => f.validate(),
            Frame::StreamDataBlocked(f) => f.validate(),
            Frame::StreamsBlocked(f) => f.validate(),
            Frame::NewConnectionId(f) => f.validate(),
            Frame::RetireConnectionId(f) => f.validate(),
            Frame::PathChallenge(f) => f.validate(),
            Frame::PathResponse(f) => f.validate(),
            Frame::ConnectionClose(f) => f.validate(),
            Frame::Datagram(f) => f.validate(),
        }
    }
}

/// Append `len` PADDING bytes (RFC 9000 Section 19.1).
pub fn write_padding<B: BufMut>(buf: &mut B, len: usize) -> Result<()> {
    let available = buf.remaining_mut();
    if available < len {
        return Err(Error::BufferTooSmall {
            needed: len,
            available,
        });
    }
    buf.put_bytes(0x00, len);
    Ok(())
}
