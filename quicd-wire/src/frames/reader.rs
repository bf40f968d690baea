//! Bounded cursor over a frame body.
//!
//! Every read is checked against the end of the region; running off the end
//! yields [`Error::Truncated`] tagged with the type code of the frame being
//! decoded, so callers can report it in CONNECTION_CLOSE.

#![forbid(unsafe_code)]

use crate::error::{Error, Result};
use crate::varint;

/// Cursor over the body of a single frame.
#[derive(Debug, Clone)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    frame_type: u64,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8], frame_type: u64) -> Self {
        Self {
            data,
            pos: 0,
            frame_type,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    fn truncated(&self) -> Error {
        Error::Truncated {
            frame_type: Some(self.frame_type),
        }
    }

    #[inline]
    pub(crate) fn read_varint(&mut self) -> Result<u64> {
        let (value, consumed) =
            varint::decode(&self.data[self.pos..]).map_err(|_| self.truncated())?;
        self.pos += consumed;
        Ok(value)
    }

    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        let b = *self.data.get(self.pos).ok_or_else(|| self.truncated())?;
        self.pos += 1;
        Ok(b)
    }

    /// Borrow the next `len` bytes. `len` comes off the wire, so it is
    /// compared before any conversion to `usize`.
    #[inline]
    pub(crate) fn read_bytes(&mut self, len: u64) -> Result<&'a [u8]> {
        if len > self.remaining() as u64 {
            return Err(self.truncated());
        }
        let start = self.pos;
        self.pos += len as usize;
        Ok(&self.data[start..self.pos])
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N as u64)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Borrow everything up to the end of the region.
    #[inline]
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let start = self.pos;
        self.pos = self.data.len();
        &self.data[start..]
    }

    #[inline]
    pub(crate) fn malformed(&self, reason: &'static str) -> Error {
        Error::malformed(self.frame_type, reason)
    }
}
