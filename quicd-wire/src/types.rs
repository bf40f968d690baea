//! # Core QUIC Types (RFC 9000)
//!
//! Primitive identifiers and limits shared by the frame codec. All types are
//! `Copy` and cheap to pass by value on the hot path.

#![forbid(unsafe_code)]

use core::fmt;

// ============================================================================
// Protocol Limits (RFC 9000 Section 4.5, 4.6, 16)
// ============================================================================

/// Largest byte offset a stream or the crypto stream can reach (2^62).
///
/// `offset + length` of STREAM and CRYPTO data must not exceed this.
pub const MAX_BYTE_COUNT: u64 = 1 << 62;

/// Largest stream count in MAX_STREAMS / STREAMS_BLOCKED (2^60).
pub const MAX_STREAM_COUNT: u64 = 1 << 60;

/// Maximum length of a Connection ID (20 bytes per RFC 9000)
pub const MAX_CID_LENGTH: usize = 20;

/// Stateless reset token carried in NEW_CONNECTION_ID frames.
pub type StatelessResetToken = [u8; 16];

// ============================================================================
// Packet Number (RFC 9000 Section 12.3)
// ============================================================================

/// Packet Number - Monotonically increasing per packet number space
pub type PacketNumber = u64;

// ============================================================================
// Encryption Level (RFC 9001 Section 4)
// ============================================================================

/// Encryption level a packet payload was protected at.
///
/// The level restricts which frame types may appear (RFC 9000 Section 12.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionLevel {
    /// Initial packets
    Initial,
    /// Handshake packets
    Handshake,
    /// 0-RTT packets (early data)
    ZeroRtt,
    /// 1-RTT packets (application data after handshake)
    OneRtt,
}

impl EncryptionLevel {
    /// All levels in handshake order.
    pub const ALL: [EncryptionLevel; 4] = [
        EncryptionLevel::Initial,
        EncryptionLevel::Handshake,
        EncryptionLevel::ZeroRtt,
        EncryptionLevel::OneRtt,
    ];
}

impl fmt::Display for EncryptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EncryptionLevel::Initial => "Initial",
            EncryptionLevel::Handshake => "Handshake",
            EncryptionLevel::ZeroRtt => "0-RTT",
            EncryptionLevel::OneRtt => "1-RTT",
        })
    }
}

// ============================================================================
// Stream ID (RFC 9000 Section 2.1)
// ============================================================================

/// Stream ID - Identifies a bidirectional or unidirectional stream
///
/// The two least significant bits encode stream type and initiator:
/// - Bit 0: Initiator (0=client, 1=server)
/// - Bit 1: Direction (0=bidirectional, 1=unidirectional)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamId(pub u64);

impl StreamId {
    /// Create a new StreamId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for StreamId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl PartialEq<u64> for StreamId {
    fn eq(&self, other: &u64) -> bool {
        self.0 == *other
    }
}

/// Stream Direction
///
/// MAX_STREAMS and STREAMS_BLOCKED carry the direction in their type code
/// rather than in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamDirection {
    Bidirectional,
    Unidirectional,
}
