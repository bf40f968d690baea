//! QUIC Frame Codec Errors
//!
//! RFC 9000 Section 20.1 defines the transport error codes carried in
//! CONNECTION_CLOSE frames. Every decode failure in this crate surfaces as
//! `FRAME_ENCODING_ERROR` (0x07); the connection layer is expected to close
//! the connection with that code and, when known, the offending frame type.

#![forbid(unsafe_code)]

use core::fmt;

use thiserror::Error;

use crate::types::EncryptionLevel;
use crate::varint::VarIntError;

/// Transport Error Codes as defined in RFC 9000 Section 20.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u64)]
pub enum TransportErrorCode {
    /// No error (0x00) - Used for graceful shutdown
    NoError = 0x00,

    /// Internal Error (0x01) - Implementation error
    InternalError = 0x01,

    /// Connection Refused (0x02) - Server refuses connection
    ConnectionRefused = 0x02,

    /// Flow Control Error (0x03) - Peer exceeded flow control limits
    FlowControlError = 0x03,

    /// Stream Limit Error (0x04) - Stream limit exceeded
    StreamLimitError = 0x04,

    /// Stream State Error (0x05) - Frame received in invalid stream state
    StreamStateError = 0x05,

    /// Final Size Error (0x06) - Final size violation
    FinalSizeError = 0x06,

    /// Frame Encoding Error (0x07) - Frame encoding error
    FrameEncodingError = 0x07,

    /// Transport Parameter Error (0x08) - Invalid transport parameters
    TransportParameterError = 0x08,

    /// Connection ID Limit Error (0x09) - Connection ID limit exceeded
    ConnectionIdLimitError = 0x09,

    /// Protocol Violation (0x0a) - Generic protocol violation
    ProtocolViolation = 0x0a,

    /// Invalid Token (0x0b) - Invalid address validation token
    InvalidToken = 0x0b,

    /// Application Error (0x0c) - Application closed connection
    ApplicationError = 0x0c,

    /// Crypto Buffer Exceeded (0x0d) - CRYPTO data buffer overflowed
    CryptoBufferExceeded = 0x0d,

    /// Key Update Error (0x0e) - Key update error
    KeyUpdateError = 0x0e,

    /// AEAD Limit Reached (0x0f) - AEAD usage limit reached
    AeadLimitReached = 0x0f,

    /// No Viable Path (0x10) - No viable network path
    NoViablePath = 0x10,
}

/// First code of the CRYPTO_ERROR range (RFC 9001 Section 4.8).
///
/// TLS alert `n` is carried as `CRYPTO_ERROR_BASE + n`.
pub const CRYPTO_ERROR_BASE: u64 = 0x0100;

/// Last code of the CRYPTO_ERROR range.
pub const CRYPTO_ERROR_MAX: u64 = 0x01ff;

impl TransportErrorCode {
    /// Wire value of this code.
    pub fn code(self) -> u64 {
        self as u64
    }

    /// Map a wire value back to a known code.
    ///
    /// Returns `None` for values outside 0x00..=0x10, including the
    /// CRYPTO_ERROR range (see [`is_crypto_error`]).
    pub fn from_code(code: u64) -> Option<Self> {
        let code = match code {
            0x00 => TransportErrorCode::NoError,
            0x01 => TransportErrorCode::InternalError,
            0x02 => TransportErrorCode::ConnectionRefused,
            0x03 => TransportErrorCode::FlowControlError,
            0x04 => TransportErrorCode::StreamLimitError,
            0x05 => TransportErrorCode::StreamStateError,
            0x06 => TransportErrorCode::FinalSizeError,
            0x07 => TransportErrorCode::FrameEncodingError,
            0x08 => TransportErrorCode::TransportParameterError,
            0x09 => TransportErrorCode::ConnectionIdLimitError,
            0x0a => TransportErrorCode::ProtocolViolation,
            0x0b => TransportErrorCode::InvalidToken,
            0x0c => TransportErrorCode::ApplicationError,
            0x0d => TransportErrorCode::CryptoBufferExceeded,
            0x0e => TransportErrorCode::KeyUpdateError,
            0x0f => TransportErrorCode::AeadLimitReached,
            0x10 => TransportErrorCode::NoViablePath,
            _ => return None,
        };
        Some(code)
    }

    /// RFC 9000 name of the code, e.g. `FRAME_ENCODING_ERROR`.
    pub fn name(self) -> &'static str {
        match self {
            TransportErrorCode::NoError => "NO_ERROR",
            TransportErrorCode::InternalError => "INTERNAL_ERROR",
            TransportErrorCode::ConnectionRefused => "CONNECTION_REFUSED",
            TransportErrorCode::FlowControlError => "FLOW_CONTROL_ERROR",
            TransportErrorCode::StreamLimitError => "STREAM_LIMIT_ERROR",
            TransportErrorCode::StreamStateError => "STREAM_STATE_ERROR",
            TransportErrorCode::FinalSizeError => "FINAL_SIZE_ERROR",
            TransportErrorCode::FrameEncodingError => "FRAME_ENCODING_ERROR",
            TransportErrorCode::TransportParameterError => "TRANSPORT_PARAMETER_ERROR",
            TransportErrorCode::ConnectionIdLimitError => "CONNECTION_ID_LIMIT_ERROR",
            TransportErrorCode::ProtocolViolation => "PROTOCOL_VIOLATION",
            TransportErrorCode::InvalidToken => "INVALID_TOKEN",
            TransportErrorCode::ApplicationError => "APPLICATION_ERROR",
            TransportErrorCode::CryptoBufferExceeded => "CRYPTO_BUFFER_EXCEEDED",
            TransportErrorCode::KeyUpdateError => "KEY_UPDATE_ERROR",
            TransportErrorCode::AeadLimitReached => "AEAD_LIMIT_REACHED",
            TransportErrorCode::NoViablePath => "NO_VIABLE_PATH",
        }
    }
}

impl fmt::Display for TransportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if `code` falls in the CRYPTO_ERROR range (0x0100-0x01ff).
pub fn is_crypto_error(code: u64) -> bool {
    (CRYPTO_ERROR_BASE..=CRYPTO_ERROR_MAX).contains(&code)
}

/// Result type for frame codec operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced while decoding or encoding frames.
///
/// Decode variants all map to `FRAME_ENCODING_ERROR`; encode variants
/// indicate a local bug and map to `INTERNAL_ERROR`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Type code maps to no known frame, or to an extension frame whose
    /// extension is disabled on the parser.
    #[error("unknown frame type: {frame_type:#x}")]
    UnknownFrameType {
        /// Raw type code read off the wire.
        frame_type: u64,
    },

    /// Known frame type received at an encryption level where it is
    /// forbidden (RFC 9000 Section 12.4, Table 3).
    #[error("frame type {frame_type:#x} not allowed at encryption level {level}")]
    NotAllowed {
        frame_type: u64,
        level: EncryptionLevel,
    },

    /// Input ended inside a varint or a frame body.
    #[error("unexpected end of frame data")]
    Truncated {
        /// Frame being decoded, if the type code was already read.
        frame_type: Option<u64>,
    },

    /// A field violates a frame-specific constraint.
    #[error("{reason}")]
    Malformed {
        frame_type: u64,
        reason: &'static str,
    },

    /// Attempt to encode an integer above 2^62-1.
    #[error("varint value {0:#x} exceeds 2^62-1")]
    VarIntOutOfRange(u64),

    /// Output buffer cannot hold the encoded frame.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// Frame value cannot be represented on the wire.
    #[error("invalid frame: {0}")]
    InvalidFrame(&'static str),
}

impl Error {
    /// Transport error code the connection should close with.
    pub fn code(&self) -> TransportErrorCode {
        match self {
            Error::UnknownFrameType { .. }
            | Error::NotAllowed { .. }
            | Error::Truncated { .. }
            | Error::Malformed { .. } => TransportErrorCode::FrameEncodingError,
            Error::VarIntOutOfRange(_)
            | Error::BufferTooSmall { .. }
            | Error::InvalidFrame(_) => TransportErrorCode::InternalError,
        }
    }

    /// Raw type code of the frame that triggered the error, when known.
    ///
    /// This is the value placed in the Frame Type field of the
    /// CONNECTION_CLOSE frame sent to the peer.
    pub fn frame_type(&self) -> Option<u64> {
        match self {
            Error::UnknownFrameType { frame_type }
            | Error::NotAllowed { frame_type, .. }
            | Error::Malformed { frame_type, .. } => Some(*frame_type),
            Error::Truncated { frame_type } => *frame_type,
            _ => None,
        }
    }

    /// Returns true for unknown and extension-gated frame types.
    pub fn is_unknown_frame_type(&self) -> bool {
        matches!(self, Error::UnknownFrameType { .. })
    }

    pub(crate) fn malformed(frame_type: u64, reason: &'static str) -> Self {
        Error::Malformed { frame_type, reason }
    }
}

impl From<VarIntError> for Error {
    fn from(e: VarIntError) -> Self {
        match e {
            VarIntError::EndOfInput | VarIntError::Truncated { .. } => {
                Error::Truncated { frame_type: None }
            }
            VarIntError::OutOfRange(value) => Error::VarIntOutOfRange(value),
            VarIntError::BufferTooSmall { needed, available } => {
                Error::BufferTooSmall { needed, available }
            }
        }
    }
}
