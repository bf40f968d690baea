//! # Frame Body Codec (RFC 9000 Section 19, RFC 9221)
//!
//! `decode` functions take the bytes following the type code and return the
//! value plus the number of body bytes consumed. Encoding goes through
//! [`WireFrame`]. ACK lives in its own module because it decodes into
//! reusable storage.

#![forbid(unsafe_code)]

use bytes::BufMut;

use crate::error::{Error, Result};
use crate::types::{StreamDirection, StreamId, MAX_BYTE_COUNT, MAX_CID_LENGTH, MAX_STREAM_COUNT};
use crate::varint;
use crate::version::Version;

use super::frame_type::*;
use super::reader::Reader;
use super::types::*;

/// Reject integers that do not fit in a varint.
pub(crate) fn check_varints(values: &[u64]) -> Result<()> {
    match values.iter().find(|v| **v > varint::MAX) {
        Some(v) => Err(Error::VarIntOutOfRange(*v)),
        None => Ok(()),
    }
}

/// Number of payload bytes that fit in `max_size` after a `header` of fixed
/// fields, accounting for the width of an optional length prefix.
fn payload_budget(header: usize, len_present: bool, max_size: usize) -> usize {
    if !len_present {
        return max_size.saturating_sub(header);
    }
    if max_size <= header {
        return 0;
    }
    let mut data_len = max_size - header - 1;
    while data_len > 0 && header + varint::encoded_len(data_len as u64) + data_len > max_size {
        data_len -= 1;
    }
    data_len
}

// ============================================================================
// RESET_STREAM / RESET_STREAM_AT
// ============================================================================

impl ResetStreamFrame {
    /// Decode RESET_STREAM, or RESET_STREAM_AT when `with_reliable_size`.
    pub fn decode(
        data: &[u8],
        with_reliable_size: bool,
        _version: Version,
    ) -> Result<(Self, usize)> {
        let frame_type = if with_reliable_size {
            FRAME_TYPE_RESET_STREAM_AT
        } else {
            FRAME_TYPE_RESET_STREAM
        };
        let mut r = Reader::new(data, frame_type);

        let stream_id = StreamId::new(r.read_varint()?);
        let error_code = r.read_varint()?;
        let final_size = r.read_varint()?;
        let reliable_size = if with_reliable_size {
            let reliable_size = r.read_varint()?;
            if reliable_size > final_size {
                return Err(r.malformed(
                    "RESET_STREAM_AT: reliable size can't be larger than final size",
                ));
            }
            Some(reliable_size)
        } else {
            None
        };

        Ok((
            ResetStreamFrame {
                stream_id,
                error_code,
                final_size,
                reliable_size,
            },
            r.position(),
        ))
    }
}

impl WireFrame for ResetStreamFrame {
    fn frame_type(&self) -> u64 {
        if self.reliable_size.is_some() {
            FRAME_TYPE_RESET_STREAM_AT
        } else {
            FRAME_TYPE_RESET_STREAM
        }
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.stream_id.value())
            + varint::encoded_len(self.error_code)
            + varint::encoded_len(self.final_size)
            + self.reliable_size.map_or(0, varint::encoded_len)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, self.frame_type())?;
        varint::write(buf, self.stream_id.value())?;
        varint::write(buf, self.error_code)?;
        varint::write(buf, self.final_size)?;
        if let Some(reliable_size) = self.reliable_size {
            varint::write(buf, reliable_size)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.stream_id.value(), self.error_code, self.final_size])?;
        if let Some(reliable_size) = self.reliable_size {
            if reliable_size > self.final_size {
                return Err(Error::InvalidFrame("reliable size larger than final size"));
            }
        }
        Ok(())
    }
}

// ============================================================================
// STOP_SENDING
// ============================================================================

impl StopSendingFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_STOP_SENDING);
        let stream_id = StreamId::new(r.read_varint()?);
        let error_code = r.read_varint()?;
        Ok((
            StopSendingFrame {
                stream_id,
                error_code,
            },
            r.position(),
        ))
    }
}

impl WireFrame for StopSendingFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_STOP_SENDING
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.stream_id.value()) + varint::encoded_len(self.error_code)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_STOP_SENDING)?;
        varint::write(buf, self.stream_id.value())?;
        varint::write(buf, self.error_code)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.stream_id.value(), self.error_code])
    }
}

// ============================================================================
// CRYPTO
// ============================================================================

impl<'a> CryptoFrame<'a> {
    pub fn decode(data: &'a [u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_CRYPTO);
        let offset = r.read_varint()?;
        let length = r.read_varint()?;
        let data = r.read_bytes(length)?;
        if offset.saturating_add(length) > MAX_BYTE_COUNT {
            return Err(r.malformed("crypto data overflows maximum offset"));
        }
        Ok((CryptoFrame { offset, data }, r.position()))
    }

    /// Largest data length such that the whole frame fits in `max_size`.
    pub fn max_data_len(&self, max_size: usize) -> usize {
        payload_budget(1 + varint::encoded_len(self.offset), true, max_size)
    }
}

impl WireFrame for CryptoFrame<'_> {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_CRYPTO
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.offset)
            + varint::encoded_len(self.data.len() as u64)
            + self.data.len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_CRYPTO)?;
        varint::write(buf, self.offset)?;
        varint::write(buf, self.data.len() as u64)?;
        buf.put_slice(self.data);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.offset])?;
        if self.offset.saturating_add(self.data.len() as u64) > MAX_BYTE_COUNT {
            return Err(Error::InvalidFrame("crypto data overflows maximum offset"));
        }
        Ok(())
    }
}

// ============================================================================
// NEW_TOKEN
// ============================================================================

impl<'a> NewTokenFrame<'a> {
    pub fn decode(data: &'a [u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_NEW_TOKEN);
        let length = r.read_varint()?;
        if length == 0 {
            return Err(r.malformed("token must not be empty"));
        }
        let token = r.read_bytes(length)?;
        Ok((NewTokenFrame { token }, r.position()))
    }
}

impl WireFrame for NewTokenFrame<'_> {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_NEW_TOKEN
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.token.len() as u64) + self.token.len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_NEW_TOKEN)?;
        varint::write(buf, self.token.len() as u64)?;
        buf.put_slice(self.token);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(Error::InvalidFrame("empty NEW_TOKEN"));
        }
        Ok(())
    }
}

// ============================================================================
// STREAM
// ============================================================================

impl<'a> StreamFrame<'a> {
    /// Decode a STREAM frame body. Without the LEN flag the data extends to
    /// the end of `data` and the consumed count covers all of it.
    pub fn decode(flags: StreamFlags, data: &'a [u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_STREAM | flags.bits() as u64);

        let stream_id = StreamId::new(r.read_varint()?);
        let offset = if flags.has_offset() { r.read_varint()? } else { 0 };
        let data = if flags.has_length() {
            let length = r.read_varint()?;
            r.read_bytes(length)?
        } else {
            r.rest()
        };

        if offset.saturating_add(data.len() as u64) > MAX_BYTE_COUNT {
            return Err(r.malformed("stream data overflows maximum offset"));
        }

        Ok((
            StreamFrame {
                stream_id,
                offset,
                fin: flags.fin(),
                data_len_present: flags.has_length(),
                data,
            },
            r.position(),
        ))
    }

    /// Flags this frame encodes with. OFF is set only for a non-zero offset.
    pub fn flags(&self) -> StreamFlags {
        StreamFlags::new(self.offset != 0, self.data_len_present, self.fin)
    }

    fn header_len(&self) -> usize {
        let mut len = 1 + varint::encoded_len(self.stream_id.value());
        if self.offset != 0 {
            len += varint::encoded_len(self.offset);
        }
        len
    }

    /// Largest data length such that the whole frame fits in `max_size`.
    pub fn max_data_len(&self, max_size: usize) -> usize {
        payload_budget(self.header_len(), self.data_len_present, max_size)
    }
}

impl WireFrame for StreamFrame<'_> {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_STREAM | self.flags().bits() as u64
    }

    fn wire_len(&self, _version: Version) -> usize {
        let mut len = self.header_len() + self.data.len();
        if self.data_len_present {
            len += varint::encoded_len(self.data.len() as u64);
        }
        len
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, self.frame_type())?;
        varint::write(buf, self.stream_id.value())?;
        if self.offset != 0 {
            varint::write(buf, self.offset)?;
        }
        if self.data_len_present {
            varint::write(buf, self.data.len() as u64)?;
        }
        buf.put_slice(self.data);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.stream_id.value(), self.offset])?;
        if self.offset.saturating_add(self.data.len() as u64) > MAX_BYTE_COUNT {
            return Err(Error::InvalidFrame("stream data overflows maximum offset"));
        }
        Ok(())
    }
}

// ============================================================================
// MAX_DATA / MAX_STREAM_DATA / MAX_STREAMS
// ============================================================================

impl MaxDataFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_MAX_DATA);
        let maximum_data = r.read_varint()?;
        Ok((MaxDataFrame { maximum_data }, r.position()))
    }
}

impl WireFrame for MaxDataFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_MAX_DATA
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.maximum_data)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_MAX_DATA)?;
        varint::write(buf, self.maximum_data)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.maximum_data])
    }
}

impl MaxStreamDataFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_MAX_STREAM_DATA);
        let stream_id = StreamId::new(r.read_varint()?);
        let maximum_stream_data = r.read_varint()?;
        Ok((
            MaxStreamDataFrame {
                stream_id,
                maximum_stream_data,
            },
            r.position(),
        ))
    }
}

impl WireFrame for MaxStreamDataFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_MAX_STREAM_DATA
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.stream_id.value())
            + varint::encoded_len(self.maximum_stream_data)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_MAX_STREAM_DATA)?;
        varint::write(buf, self.stream_id.value())?;
        varint::write(buf, self.maximum_stream_data)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.stream_id.value(), self.maximum_stream_data])
    }
}

fn streams_frame_type(direction: StreamDirection, bidi: u64, uni: u64) -> u64 {
    match direction {
        StreamDirection::Bidirectional => bidi,
        StreamDirection::Unidirectional => uni,
    }
}

impl MaxStreamsFrame {
    pub fn decode(
        direction: StreamDirection,
        data: &[u8],
        _version: Version,
    ) -> Result<(Self, usize)> {
        let frame_type =
            streams_frame_type(direction, FRAME_TYPE_MAX_STREAMS_BIDI, FRAME_TYPE_MAX_STREAMS_UNI);
        let mut r = Reader::new(data, frame_type);
        let max_streams = r.read_varint()?;
        if max_streams > MAX_STREAM_COUNT {
            return Err(r.malformed("MAX_STREAMS value exceeds the maximum stream count"));
        }
        Ok((
            MaxStreamsFrame {
                direction,
                max_streams,
            },
            r.position(),
        ))
    }
}

impl WireFrame for MaxStreamsFrame {
    fn frame_type(&self) -> u64 {
        streams_frame_type(
            self.direction,
            FRAME_TYPE_MAX_STREAMS_BIDI,
            FRAME_TYPE_MAX_STREAMS_UNI,
        )
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.max_streams)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, self.frame_type())?;
        varint::write(buf, self.max_streams)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_streams > MAX_STREAM_COUNT {
            return Err(Error::InvalidFrame("stream count exceeds 2^60"));
        }
        Ok(())
    }
}

// ============================================================================
// DATA_BLOCKED / STREAM_DATA_BLOCKED / STREAMS_BLOCKED
// ============================================================================

impl DataBlockedFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_DATA_BLOCKED);
        let maximum_data = r.read_varint()?;
        Ok((DataBlockedFrame { maximum_data }, r.position()))
    }
}

impl WireFrame for DataBlockedFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_DATA_BLOCKED
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.maximum_data)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_DATA_BLOCKED)?;
        varint::write(buf, self.maximum_data)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.maximum_data])
    }
}

impl StreamDataBlockedFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_STREAM_DATA_BLOCKED);
        let stream_id = StreamId::new(r.read_varint()?);
        let maximum_stream_data = r.read_varint()?;
        Ok((
            StreamDataBlockedFrame {
                stream_id,
                maximum_stream_data,
            },
            r.position(),
        ))
    }
}

impl WireFrame for StreamDataBlockedFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_STREAM_DATA_BLOCKED
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.stream_id.value())
            + varint::encoded_len(self.maximum_stream_data)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_STREAM_DATA_BLOCKED)?;
        varint::write(buf, self.stream_id.value())?;
        varint::write(buf, self.maximum_stream_data)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.stream_id.value(), self.maximum_stream_data])
    }
}

impl StreamsBlockedFrame {
    pub fn decode(
        direction: StreamDirection,
        data: &[u8],
        _version: Version,
    ) -> Result<(Self, usize)> {
        let frame_type = streams_frame_type(
            direction,
            FRAME_TYPE_STREAMS_BLOCKED_BIDI,
            FRAME_TYPE_STREAMS_BLOCKED_UNI,
        );
        let mut r = Reader::new(data, frame_type);
        let stream_limit = r.read_varint()?;
        if stream_limit > MAX_STREAM_COUNT {
            return Err(r.malformed("STREAMS_BLOCKED value exceeds the maximum stream count"));
        }
        Ok((
            StreamsBlockedFrame {
                direction,
                stream_limit,
            },
            r.position(),
        ))
    }
}

impl WireFrame for StreamsBlockedFrame {
    fn frame_type(&self) -> u64 {
        streams_frame_type(
            self.direction,
            FRAME_TYPE_STREAMS_BLOCKED_BIDI,
            FRAME_TYPE_STREAMS_BLOCKED_UNI,
        )
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.stream_limit)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, self.frame_type())?;
        varint::write(buf, self.stream_limit)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.stream_limit > MAX_STREAM_COUNT {
            return Err(Error::InvalidFrame("stream count exceeds 2^60"));
        }
        Ok(())
    }
}

// ============================================================================
// NEW_CONNECTION_ID / RETIRE_CONNECTION_ID
// ============================================================================

impl<'a> NewConnectionIdFrame<'a> {
    pub fn decode(data: &'a [u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_NEW_CONNECTION_ID);
        let sequence_number = r.read_varint()?;
        let retire_prior_to = r.read_varint()?;
        if retire_prior_to > sequence_number {
            return Err(r.malformed("Retire Prior To value larger than Sequence Number"));
        }

        let cid_len = r.read_u8()? as usize;
        if cid_len == 0 {
            return Err(r.malformed("invalid zero-length connection ID"));
        }
        if cid_len > MAX_CID_LENGTH {
            return Err(r.malformed("invalid connection ID length"));
        }
        let connection_id = r.read_bytes(cid_len as u64)?;
        let stateless_reset_token = r.read_array::<16>()?;

        Ok((
            NewConnectionIdFrame {
                sequence_number,
                retire_prior_to,
                connection_id,
                stateless_reset_token,
            },
            r.position(),
        ))
    }
}

impl WireFrame for NewConnectionIdFrame<'_> {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_NEW_CONNECTION_ID
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.sequence_number)
            + varint::encoded_len(self.retire_prior_to)
            + 1
            + self.connection_id.len()
            + self.stateless_reset_token.len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_NEW_CONNECTION_ID)?;
        varint::write(buf, self.sequence_number)?;
        varint::write(buf, self.retire_prior_to)?;
        buf.put_u8(self.connection_id.len() as u8);
        buf.put_slice(self.connection_id);
        buf.put_slice(&self.stateless_reset_token);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.sequence_number])?;
        if self.retire_prior_to > self.sequence_number {
            return Err(Error::InvalidFrame("retire_prior_to larger than sequence number"));
        }
        if self.connection_id.is_empty() || self.connection_id.len() > MAX_CID_LENGTH {
            return Err(Error::InvalidFrame("connection ID length must be 1 to 20"));
        }
        Ok(())
    }
}

impl RetireConnectionIdFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_RETIRE_CONNECTION_ID);
        let sequence_number = r.read_varint()?;
        Ok((RetireConnectionIdFrame { sequence_number }, r.position()))
    }
}

impl WireFrame for RetireConnectionIdFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_RETIRE_CONNECTION_ID
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + varint::encoded_len(self.sequence_number)
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_RETIRE_CONNECTION_ID)?;
        varint::write(buf, self.sequence_number)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.sequence_number])
    }
}

// ============================================================================
// PATH_CHALLENGE / PATH_RESPONSE
// ============================================================================

impl PathChallengeFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_PATH_CHALLENGE);
        let data = r.read_array::<8>()?;
        Ok((PathChallengeFrame { data }, r.position()))
    }
}

impl WireFrame for PathChallengeFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_PATH_CHALLENGE
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + 8
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_PATH_CHALLENGE)?;
        buf.put_slice(&self.data);
        Ok(())
    }
}

impl PathResponseFrame {
    pub fn decode(data: &[u8], _version: Version) -> Result<(Self, usize)> {
        let mut r = Reader::new(data, FRAME_TYPE_PATH_RESPONSE);
        let data = r.read_array::<8>()?;
        Ok((PathResponseFrame { data }, r.position()))
    }
}

impl WireFrame for PathResponseFrame {
    fn frame_type(&self) -> u64 {
        FRAME_TYPE_PATH_RESPONSE
    }

    fn wire_len(&self, _version: Version) -> usize {
        1 + 8
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, FRAME_TYPE_PATH_RESPONSE)?;
        buf.put_slice(&self.data);
        Ok(())
    }
}

// ============================================================================
// CONNECTION_CLOSE
// ============================================================================

impl<'a> ConnectionCloseFrame<'a> {
    /// Decode type 0x1c (`is_application_error == false`) or 0x1d.
    pub fn decode(
        is_application_error: bool,
        data: &'a [u8],
        _version: Version,
    ) -> Result<(Self, usize)> {
        let frame_type = if is_application_error {
            FRAME_TYPE_APPLICATION_CLOSE
        } else {
            FRAME_TYPE_CONNECTION_CLOSE
        };
        let mut r = Reader::new(data, frame_type);

        let error_code = r.read_varint()?;
        let offending_type = if is_application_error { 0 } else { r.read_varint()? };
        let reason_len = r.read_varint()?;
        let reason_phrase = r.read_bytes(reason_len)?;

        Ok((
            ConnectionCloseFrame {
                is_application_error,
                error_code,
                frame_type: offending_type,
                reason_phrase,
            },
            r.position(),
        ))
    }
}

impl WireFrame for ConnectionCloseFrame<'_> {
    fn frame_type(&self) -> u64 {
        if self.is_application_error {
            FRAME_TYPE_APPLICATION_CLOSE
        } else {
            FRAME_TYPE_CONNECTION_CLOSE
        }
    }

    fn wire_len(&self, _version: Version) -> usize {
        let mut len = 1 + varint::encoded_len(self.error_code);
        if !self.is_application_error {
            len += varint::encoded_len(self.frame_type);
        }
        len + varint::encoded_len(self.reason_phrase.len() as u64) + self.reason_phrase.len()
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, WireFrame::frame_type(self))?;
        varint::write(buf, self.error_code)?;
        if !self.is_application_error {
            varint::write(buf, self.frame_type)?;
        }
        varint::write(buf, self.reason_phrase.len() as u64)?;
        buf.put_slice(self.reason_phrase);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        check_varints(&[self.error_code, self.frame_type])
    }
}

// ============================================================================
// DATAGRAM (RFC 9221)
// ============================================================================

impl<'a> DatagramFrame<'a> {
    /// Decode type 0x31 (`data_len_present`) or 0x30, which runs to the end
    /// of `data`.
    pub fn decode(
        data_len_present: bool,
        data: &'a [u8],
        _version: Version,
    ) -> Result<(Self, usize)> {
        let frame_type = if data_len_present {
            FRAME_TYPE_DATAGRAM_WITH_LENGTH
        } else {
            FRAME_TYPE_DATAGRAM
        };
        let mut r = Reader::new(data, frame_type);
        let data = if data_len_present {
            let length = r.read_varint()?;
            r.read_bytes(length)?
        } else {
            r.rest()
        };
        Ok((
            DatagramFrame {
                data_len_present,
                data,
            },
            r.position(),
        ))
    }

    /// Largest payload such that the whole frame fits in `max_size`.
    pub fn max_data_len(&self, max_size: usize) -> usize {
        payload_budget(1, self.data_len_present, max_size)
    }
}

impl WireFrame for DatagramFrame<'_> {
    fn frame_type(&self) -> u64 {
        if self.data_len_present {
            FRAME_TYPE_DATAGRAM_WITH_LENGTH
        } else {
            FRAME_TYPE_DATAGRAM
        }
    }

    fn wire_len(&self, _version: Version) -> usize {
        let mut len = 1 + self.data.len();
        if self.data_len_present {
            len += varint::encoded_len(self.data.len() as u64);
        }
        len
    }

    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        varint::write(buf, self.frame_type())?;
        if self.data_len_present {
            varint::write(buf, self.data.len() as u64)?;
        }
        buf.put_slice(self.data);
        Ok(())
    }
}
