//! quicd-wire: QUIC frame codec
//!
//! Decodes and encodes the frames carried in QUIC packet payloads as
//! specified in RFC 9000 Section 19, plus DATAGRAM (RFC 9221) and
//! RESET_STREAM_AT.
//!
//! # Design
//!
//! - **Zero-copy decoding**: STREAM, CRYPTO, DATAGRAM and other byte payloads
//!   borrow the packet buffer
//! - **No per-frame allocation**: ACK frames decode into storage owned by the
//!   [`FrameParser`] and reused for every ACK
//! - **Encryption-level checks**: frames forbidden at a packet's encryption
//!   level are rejected before their body is read
//! - **Transport errors**: every decode failure maps to
//!   `FRAME_ENCODING_ERROR` with the offending frame type when known
//!
//! # Module Organization
//!
//! - `varint`: RFC 9000 Section 16 integer codec
//! - `frames`: frame types, codec and parser
//! - `config`: parser configuration
//! - `error`: transport error codes and the codec error type
//! - `types`, `version`: shared protocol primitives
//!
//! # Example
//!
//! ```
//! use quicd_wire::{EncryptionLevel, Frame, FrameParser, VERSION_1};
//!
//! let mut parser = FrameParser::new(false, false);
//! let payload = [0x00, 0x00, 0x01, 0x10, 0x44, 0x00];
//!
//! let mut kinds = Vec::new();
//! parser
//!     .for_each_frame(&payload, EncryptionLevel::OneRtt, VERSION_1, |frame| {
//!         kinds.push(frame.kind());
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(kinds.len(), 2);
//!
//! let (consumed, frame) = parser
//!     .decode_next(&payload[3..], EncryptionLevel::OneRtt, VERSION_1)
//!     .unwrap();
//! assert_eq!(consumed, 3);
//! assert!(matches!(frame, Some(Frame::MaxData(_))));
//! ```

pub mod config;
pub mod error;
pub mod frames;
pub mod types;
pub mod varint;
pub mod version;

// Re-export key types
pub use config::FrameParserConfig;
pub use error::{Error, Result, TransportErrorCode};
pub use frames::{
    AckFrame, AckRange, EcnCounts, Frame, FrameParser, FrameType, StreamFrame, WireFrame,
};
pub use types::{EncryptionLevel, StreamDirection, StreamId};
pub use version::{Version, VERSION_1, VERSION_2};
