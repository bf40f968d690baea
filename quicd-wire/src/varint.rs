//! # Variable-Length Integer Encoding (RFC 9000 Section 16)
//!
//! QUIC uses a variable-length encoding for non-negative integers. The two
//! most significant bits of the first byte select the width:
//!
//! | Prefix | Length | Usable Bits | Range                 |
//! |--------|--------|-------------|-----------------------|
//! | 00     | 1      | 6           | 0-63                  |
//! | 01     | 2      | 14          | 0-16383               |
//! | 10     | 4      | 30          | 0-1073741823          |
//! | 11     | 8      | 62          | 0-4611686018427387903 |
//!
//! Every frame type, length, identifier and offset goes through this module.

#![forbid(unsafe_code)]

use bytes::BufMut;
use thiserror::Error;

/// Maximum value that can be encoded (2^62 - 1)
pub const MAX: u64 = (1u64 << 62) - 1;

/// Errors from the varint codec.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarIntError {
    /// The input slice was empty.
    #[error("end of input")]
    EndOfInput,

    /// The first byte announces more bytes than are available.
    #[error("truncated varint: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// Value exceeds 2^62-1.
    #[error("varint value {0:#x} exceeds maximum")]
    OutOfRange(u64),

    /// Output buffer is too small for the encoding.
    #[error("buffer too small for varint: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },
}

/// Width in bytes announced by the first byte of an encoding.
#[inline]
pub fn parse_len(first: u8) -> usize {
    1 << (first >> 6)
}

/// Decode a variable-length integer from a byte slice.
///
/// Returns the decoded value and the number of bytes consumed.
#[inline]
pub fn decode(data: &[u8]) -> Result<(u64, usize), VarIntError> {
    let first = match data.first() {
        Some(b) => *b,
        None => return Err(VarIntError::EndOfInput),
    };

    let len = parse_len(first);
    if data.len() < len {
        return Err(VarIntError::Truncated {
            needed: len,
            available: data.len(),
        });
    }

    let mut value = (first & 0x3f) as u64;
    for b in &data[1..len] {
        value = (value << 8) | *b as u64;
    }
    Ok((value, len))
}

/// Calculate the encoded length of a varint without encoding it.
#[inline]
pub fn encoded_len(value: u64) -> usize {
    if value < 64 {
        1
    } else if value < 16384 {
        2
    } else if value < 1073741824 {
        4
    } else {
        8
    }
}

/// Encode a variable-length integer into a byte slice using the minimal width.
///
/// Returns the number of bytes written.
pub fn encode(value: u64, buf: &mut [u8]) -> Result<usize, VarIntError> {
    if value > MAX {
        return Err(VarIntError::OutOfRange(value));
    }
    encode_with_len(value, encoded_len(value), buf)
}

/// Encode a variable-length integer with an explicit width of 1, 2, 4 or 8.
///
/// Non-minimal encodings are valid on the wire; this is used to reserve a
/// fixed-size length field before the payload size is known.
pub fn encode_with_len(value: u64, len: usize, buf: &mut [u8]) -> Result<usize, VarIntError> {
    let prefix: u8 = match len {
        1 if value < 64 => 0x00,
        2 if value < 16384 => 0x40,
        4 if value < 1073741824 => 0x80,
        8 if value <= MAX => 0xc0,
        _ => return Err(VarIntError::OutOfRange(value)),
    };
    if buf.len() < len {
        return Err(VarIntError::BufferTooSmall {
            needed: len,
            available: buf.len(),
        });
    }

    let bytes = value.to_be_bytes();
    buf[..len].copy_from_slice(&bytes[8 - len..]);
    buf[0] |= prefix;
    Ok(len)
}

/// Append a variable-length integer to a buffer that implements BufMut.
///
/// # Panics
///
/// Panics like [`BufMut::put_slice`] if the buffer cannot grow; frame
/// encoders check capacity up front.
#[inline]
pub fn write<B: BufMut>(buf: &mut B, value: u64) -> Result<usize, VarIntError> {
    let mut tmp = [0u8; 8];
    let len = encode(value, &mut tmp)?;
    buf.put_slice(&tmp[..len]);
    Ok(len)
}
