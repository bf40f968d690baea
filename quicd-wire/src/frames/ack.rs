//! # ACK Frames (RFC 9000 Section 19.3)
//!
//! ACK is the second-hottest frame on the receive path, so decoding writes
//! into an existing [`AckFrame`] instead of building a new one. Ranges live
//! in a `TinyVec` that stays inline for up to eight ranges and keeps its heap
//! capacity across [`AckFrame::reset`] once it has spilled.
//!
//! On the wire ranges are gap-encoded downward from the largest
//! acknowledged packet:
//!
//! ```text
//! Largest Acknowledged, ACK Delay, ACK Range Count, First ACK Range,
//! (Gap, ACK Range Length) * ACK Range Count, [ECT0, ECT1, ECN-CE]
//! ```

#![forbid(unsafe_code)]

use std::time::Duration;

use bytes::BufMut;
use tinyvec::TinyVec;

use crate::config::DEFAULT_ACK_DELAY_EXPONENT;
use crate::error::{Error, Result};
use crate::types::PacketNumber;
use crate::varint;
use crate::version::Version;

use super::codec::check_varints;
use super::frame_type::{FRAME_TYPE_ACK, FRAME_TYPE_ACK_ECN};
use super::reader::Reader;
use super::types::WireFrame;

/// Inclusive range of acknowledged packet numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AckRange {
    pub smallest: PacketNumber,
    pub largest: PacketNumber,
}

impl AckRange {
    pub fn new(smallest: PacketNumber, largest: PacketNumber) -> Self {
        Self { smallest, largest }
    }

    /// Number of packets in the range.
    pub fn len(&self) -> u64 {
        self.largest - self.smallest + 1
    }

    /// Always false; a range holds at least one packet.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// ECN Counts (RFC 9000 Section 19.3.2)
///
/// Explicit Congestion Notification counters reported in ACK frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EcnCounts {
    /// ECT(0) marked packets received
    pub ect0: u64,

    /// ECT(1) marked packets received
    pub ect1: u64,

    /// ECN-CE marked packets received
    pub ce: u64,
}

/// ACK / ACK_ECN Frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AckFrame {
    /// Acknowledged ranges, highest first, separated by at least one
    /// missing packet
    pub ranges: TinyVec<[AckRange; 8]>,

    /// Time between receipt of the largest acknowledged packet and sending
    /// of this ACK
    pub delay: Duration,

    /// Present iff the frame is ACK_ECN (0x03)
    pub ecn_counts: Option<EcnCounts>,
}

/// `delay * 2^exponent` microseconds, saturating.
fn scale_delay(delay: u64, exponent: u8) -> Duration {
    let micros = if u32::from(exponent) >= u64::BITS || delay > (u64::MAX >> exponent) {
        u64::MAX
    } else {
        delay << exponent
    };
    Duration::from_micros(micros)
}

impl AckFrame {
    /// Build a frame from ranges given highest first.
    pub fn with_ranges(ranges: &[AckRange], delay: Duration) -> Self {
        let mut frame = AckFrame {
            delay,
            ..AckFrame::default()
        };
        frame.ranges.extend(ranges.iter().copied());
        frame
    }

    /// Clear for reuse, keeping any range storage already allocated.
    pub fn reset(&mut self) {
        self.ranges.clear();
        self.delay = Duration::ZERO;
        self.ecn_counts = None;
    }

    /// Decode an ACK body into `self`, replacing its contents.
    ///
    /// `ecn` selects ACK_ECN (0x03). The raw ACK Delay field is scaled by
    /// `2^ack_delay_exponent` microseconds.
    pub fn decode_into(
        &mut self,
        ecn: bool,
        data: &[u8],
        ack_delay_exponent: u8,
        _version: Version,
    ) -> Result<usize> {
        self.reset();
        let frame_type = if ecn { FRAME_TYPE_ACK_ECN } else { FRAME_TYPE_ACK };
        let mut r = Reader::new(data, frame_type);

        let largest_acked = r.read_varint()?;
        self.delay = scale_delay(r.read_varint()?, ack_delay_exponent);
        let range_count = r.read_varint()?;

        let first_range = r.read_varint()?;
        if first_range > largest_acked {
            return Err(r.malformed("invalid first ACK range"));
        }
        let mut smallest = largest_acked - first_range;
        self.ranges.push(AckRange::new(smallest, largest_acked));

        // Every pair takes at least two bytes, so truncation bounds the loop
        // even for an absurd range count.
        for _ in 0..range_count {
            let gap = r.read_varint()?;
            if smallest < gap + 2 {
                return Err(r.malformed("invalid ACK gap"));
            }
            let largest = smallest - gap - 2;

            let len = r.read_varint()?;
            if len > largest {
                return Err(r.malformed("invalid ACK range length"));
            }
            smallest = largest - len;
            self.ranges.push(AckRange::new(smallest, largest));
        }

        if ecn {
            self.ecn_counts = Some(EcnCounts {
                ect0: r.read_varint()?,
                ect1: r.read_varint()?,
                ce: r.read_varint()?,
            });
        }

        Ok(r.position())
    }

    /// Decode into a fresh frame.
    pub fn decode(
        ecn: bool,
        data: &[u8],
        ack_delay_exponent: u8,
        version: Version,
    ) -> Result<(Self, usize)> {
        let mut frame = AckFrame::default();
        let consumed = frame.decode_into(ecn, data, ack_delay_exponent, version)?;
        Ok((frame, consumed))
    }

    /// Largest acknowledged packet number, 0 if there are no ranges.
    pub fn largest_acked(&self) -> PacketNumber {
        self.ranges.first().map_or(0, |r| r.largest)
    }

    /// Smallest acknowledged packet number, 0 if there are no ranges.
    pub fn lowest_acked(&self) -> PacketNumber {
        self.ranges.last().map_or(0, |r| r.smallest)
    }

    /// Returns true if the frame contains gaps.
    pub fn has_missing_ranges(&self) -> bool {
        self.ranges.len() > 1
    }

    /// Returns true if packet `pn` is covered by one of the ranges.
    pub fn acks_packet(&self, pn: PacketNumber) -> bool {
        if self.ranges.is_empty() || pn < self.lowest_acked() || pn > self.largest_acked() {
            return false;
        }
        // Ranges are descending; find the first one starting at or below pn.
        let i = self.ranges.partition_point(|r| pn < r.smallest);
        i < self.ranges.len() && pn <= self.ranges[i].largest
    }

    fn encoded_delay(&self) -> u64 {
        let units = self.delay.as_micros() >> DEFAULT_ACK_DELAY_EXPONENT;
        units.min(u128::from(varint::MAX)) as u64
    }

    /// Gap and length fields for each range after the first.
    ///
    /// Saturates on ranges that fail [`WireFrame::validate`], which `encode`
    /// checks before writing.
    fn gap_fields(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.ranges.windows(2).map(|w| {
            let (prev, cur) = (w[0], w[1]);
            (
                prev.smallest.saturating_sub(cur.largest).saturating_sub(2),
                cur.largest.saturating_sub(cur.smallest),
            )
        })
    }
}

impl WireFrame for AckFrame {
    fn frame_type(&self) -> u64 {
        if self.ecn_counts.is_some() {
            FRAME_TYPE_ACK_ECN
        } else {
            FRAME_TYPE_ACK
        }
    }

    fn wire_len(&self, _version: Version) -> usize {
        let Some(first) = self.ranges.first() else {
            return 0;
        };
        let mut len = 1
            + varint::encoded_len(first.largest)
            + varint::encoded_len(self.encoded_delay())
            + varint::encoded_len(self.ranges.len() as u64 - 1)
            + varint::encoded_len(first.largest.saturating_sub(first.smallest));
        for (gap, range_len) in self.gap_fields() {
            len += varint::encoded_len(gap) + varint::encoded_len(range_len);
        }
        if let Some(ecn) = &self.ecn_counts {
            len += varint::encoded_len(ecn.ect0)
                + varint::encoded_len(ecn.ect1)
                + varint::encoded_len(ecn.ce);
        }
        len
    }

    /// The delay is always written with the default exponent.
    fn encode<B: BufMut>(&self, buf: &mut B, _version: Version) -> Result<()> {
        self.validate()?;
        let first = self
            .ranges
            .first()
            .ok_or(Error::InvalidFrame("ACK frame without ranges"))?;

        varint::write(buf, self.frame_type())?;
        varint::write(buf, first.largest)?;
        varint::write(buf, self.encoded_delay())?;
        varint::write(buf, self.ranges.len() as u64 - 1)?;
        varint::write(buf, first.largest - first.smallest)?;
        for (gap, range_len) in self.gap_fields() {
            varint::write(buf, gap)?;
            varint::write(buf, range_len)?;
        }
        if let Some(ecn) = &self.ecn_counts {
            varint::write(buf, ecn.ect0)?;
            varint::write(buf, ecn.ect1)?;
            varint::write(buf, ecn.ce)?;
        }
        Ok(())
    }

    /// Ranges must be non-empty, each well-formed, strictly descending and
    /// separated by at least one unacknowledged packet.
    fn validate(&self) -> Result<()> {
        let first = self
            .ranges
            .first()
            .ok_or(Error::InvalidFrame("ACK frame without ranges"))?;
        check_varints(&[first.largest])?;
        if self.ranges.iter().any(|r| r.smallest > r.largest) {
            return Err(Error::InvalidFrame("ACK range with smallest above largest"));
        }
        if self
            .ranges
            .windows(2)
            .any(|w| w[1].largest.saturating_add(1) >= w[0].smallest)
        {
            return Err(Error::InvalidFrame("ACK ranges overlapping or out of order"));
        }
        if let Some(ecn) = &self.ecn_counts {
            check_varints(&[ecn.ect0, ecn.ect1, ecn.ce])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::types::Frame;
    use crate::version::VERSION_1;

    fn encode(frame: &AckFrame) -> Vec<u8> {
        let mut buf = Vec::new();
        frame.append(&mut buf, VERSION_1).unwrap();
        buf
    }

    mod decode_tests {
        use super::*;

        #[test]
        fn test_single_range() {
            // largest=0x13, delay=0, count=0, first=0x12
            let buf = [0x13, 0x00, 0x00, 0x12];
            let (frame, consumed) = AckFrame::decode(false, &buf, 3, VERSION_1).unwrap();
            assert_eq!(consumed, 4);
            assert_eq!(frame.largest_acked(), 0x13);
            assert_eq!(frame.lowest_acked(), 1);
            assert!(!frame.has_missing_ranges());
            assert_eq!(frame.ecn_counts, None);
        }

        #[test]
        fn test_multiple_ranges() {
            // 100..=100, 95..=98, 80..=90
            // first=0; gap = 100-98-2 = 0, len = 3; gap = 95-90-2 = 3, len = 10
            let buf = [0x40, 0x64, 0x00, 0x02, 0x00, 0x00, 0x03, 0x03, 0x0a];
            let (frame, consumed) = AckFrame::decode(false, &buf, 3, VERSION_1).unwrap();
            assert_eq!(consumed, buf.len());
            assert_eq!(
                &frame.ranges[..],
                &[
                    AckRange::new(100, 100),
                    AckRange::new(95, 98),
                    AckRange::new(80, 90)
                ]
            );
            assert!(frame.has_missing_ranges());
            assert!(frame.acks_packet(96));
            assert!(frame.acks_packet(80));
            assert!(!frame.acks_packet(99));
            assert!(!frame.acks_packet(91));
            assert!(!frame.acks_packet(79));
            assert!(!frame.acks_packet(101));
        }

        #[test]
        fn test_ecn_counts() {
            let buf = [0x05, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03];
            let (frame, consumed) = AckFrame::decode(true, &buf, 3, VERSION_1).unwrap();
            assert_eq!(consumed, 7);
            assert_eq!(
                frame.ecn_counts,
                Some(EcnCounts {
                    ect0: 1,
                    ect1: 2,
                    ce: 3
                })
            );
        }

        #[test]
        fn test_delay_scaling() {
            let buf = [0x01, 0x0a, 0x00, 0x00];
            let (frame, _) = AckFrame::decode(false, &buf, 3, VERSION_1).unwrap();
            assert_eq!(frame.delay, Duration::from_micros(80));
            let (frame, _) = AckFrame::decode(false, &buf, 0, VERSION_1).unwrap();
            assert_eq!(frame.delay, Duration::from_micros(10));
        }

        #[test]
        fn test_delay_saturates() {
            let mut buf = vec![0x01];
            buf.extend_from_slice(&[0xff; 8]);
            buf.extend_from_slice(&[0x00, 0x00]);
            let (frame, _) = AckFrame::decode(false, &buf, 20, VERSION_1).unwrap();
            assert_eq!(frame.delay, Duration::from_micros(u64::MAX));
            assert_eq!(scale_delay(1, 64), Duration::from_micros(u64::MAX));
        }

        #[test]
        fn test_first_range_exceeds_largest() {
            let buf = [0x05, 0x00, 0x00, 0x06];
            let err = AckFrame::decode(false, &buf, 3, VERSION_1).unwrap_err();
            assert_eq!(err, Error::malformed(FRAME_TYPE_ACK, "invalid first ACK range"));
        }

        #[test]
        fn test_gap_underflow() {
            // 10..=10, then gap 9 would put the next range below zero
            let buf = [0x0a, 0x00, 0x01, 0x00, 0x09, 0x00];
            let err = AckFrame::decode(false, &buf, 3, VERSION_1).unwrap_err();
            assert_eq!(err, Error::malformed(FRAME_TYPE_ACK, "invalid ACK gap"));
        }

        #[test]
        fn test_range_length_underflow() {
            // 10..=10, gap 0 -> next largest 8, length 9 goes below zero
            let buf = [0x0a, 0x00, 0x01, 0x00, 0x00, 0x09];
            let err = AckFrame::decode(true, &buf, 3, VERSION_1).unwrap_err();
            assert_eq!(err, Error::malformed(FRAME_TYPE_ACK_ECN, "invalid ACK range length"));
        }

        #[test]
        fn test_truncated_ranges() {
            let buf = [0x0a, 0x00, 0x02, 0x00, 0x00, 0x01];
            assert_eq!(
                AckFrame::decode(false, &buf, 3, VERSION_1).unwrap_err(),
                Error::Truncated {
                    frame_type: Some(FRAME_TYPE_ACK)
                }
            );
            // Huge range count is bounded by input
            let buf = [0x0a, 0x00, 0xbf, 0xff, 0xff, 0xff, 0x00];
            assert!(AckFrame::decode(false, &buf, 3, VERSION_1).is_err());
        }

        #[test]
        fn test_decode_into_replaces_contents() {
            let mut frame = AckFrame::with_ranges(
                &[AckRange::new(50, 60), AckRange::new(10, 20)],
                Duration::from_millis(5),
            );
            frame.ecn_counts = Some(EcnCounts::default());
            let consumed = frame
                .decode_into(false, &[0x13, 0x00, 0x00, 0x12], 3, VERSION_1)
                .unwrap();
            assert_eq!(consumed, 4);
            assert_eq!(&frame.ranges[..], &[AckRange::new(1, 0x13)]);
            assert_eq!(frame.delay, Duration::ZERO);
            assert_eq!(frame.ecn_counts, None);
        }
    }

    mod encode_tests {
        use super::*;

        #[test]
        fn test_encode_single_range() {
            let frame = AckFrame::with_ranges(&[AckRange::new(1, 0x13)], Duration::ZERO);
            assert_eq!(encode(&frame), vec![0x02, 0x13, 0x00, 0x00, 0x12]);
        }

        #[test]
        fn test_encode_uses_default_exponent() {
            let frame = AckFrame::with_ranges(&[AckRange::new(1, 1)], Duration::from_micros(80));
            assert_eq!(encode(&frame), vec![0x02, 0x01, 0x0a, 0x00, 0x00]);
        }

        #[test]
        fn test_encode_ecn_selects_type() {
            let mut frame = AckFrame::with_ranges(&[AckRange::new(5, 5)], Duration::ZERO);
            frame.ecn_counts = Some(EcnCounts {
                ect0: 1,
                ect1: 2,
                ce: 3,
            });
            assert_eq!(encode(&frame), vec![0x03, 0x05, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03]);
        }

        #[test]
        fn test_encode_matches_decode_layout() {
            let frame = AckFrame::with_ranges(
                &[
                    AckRange::new(100, 100),
                    AckRange::new(95, 98),
                    AckRange::new(80, 90),
                ],
                Duration::ZERO,
            );
            let buf = encode(&frame);
            assert_eq!(buf.len(), frame.wire_len(VERSION_1));
            assert_eq!(&buf[1..], &[0x40, 0x64, 0x00, 0x02, 0x00, 0x00, 0x03, 0x03, 0x0a]);
        }

        #[test]
        fn test_encode_rejects_bad_ranges() {
            let mut buf = Vec::new();
            let empty = AckFrame::default();
            assert!(empty.append(&mut buf, VERSION_1).is_err());

            let adjacent = AckFrame::with_ranges(
                &[AckRange::new(10, 12), AckRange::new(5, 9)],
                Duration::ZERO,
            );
            assert!(adjacent.append(&mut buf, VERSION_1).is_err());

            let inverted = AckFrame::with_ranges(&[AckRange::new(12, 10)], Duration::ZERO);
            assert!(inverted.append(&mut buf, VERSION_1).is_err());
            assert!(buf.is_empty());
        }

        #[test]
        fn test_direct_encode_rejects_bad_ranges() {
            let mut buf = Vec::new();
            let adjacent = AckFrame::with_ranges(
                &[AckRange::new(5, 9), AckRange::new(1, 4)],
                Duration::ZERO,
            );
            assert_eq!(
                Frame::Ack(&adjacent).encode(&mut buf, VERSION_1),
                Err(Error::InvalidFrame("ACK ranges overlapping or out of order"))
            );

            let overlapping = AckFrame::with_ranges(
                &[AckRange::new(5, 9), AckRange::new(3, 7)],
                Duration::ZERO,
            );
            assert!(overlapping.encode(&mut buf, VERSION_1).is_err());
            assert!(buf.is_empty());

            // wire_len stays total on frames that encode refuses
            assert!(adjacent.wire_len(VERSION_1) > 0);
            let inverted = AckFrame::with_ranges(&[AckRange::new(12, 10)], Duration::ZERO);
            assert!(inverted.wire_len(VERSION_1) > 0);
        }
    }

    mod storage_tests {
        use super::*;

        #[test]
        fn test_reset_keeps_spilled_capacity() {
            let ranges: Vec<AckRange> = (0..20u64)
                .rev()
                .map(|i| AckRange::new(i * 10, i * 10 + 5))
                .collect();
            let mut frame = AckFrame::with_ranges(&ranges, Duration::ZERO);
            assert!(frame.ranges.is_heap());
            let capacity = frame.ranges.capacity();
            frame.reset();
            assert!(frame.ranges.is_empty());
            assert!(frame.ranges.is_heap());
            assert_eq!(frame.ranges.capacity(), capacity);
        }

        #[test]
        fn test_range_len() {
            assert_eq!(AckRange::new(5, 5).len(), 1);
            assert_eq!(AckRange::new(80, 90).len(), 11);
        }
    }
}
