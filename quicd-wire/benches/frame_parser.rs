//! Benchmarks for frame parsing.
//!
//! These benchmarks measure the receive hot path:
//! - STREAM decode with and without the LEN flag
//! - ACK decode into the parser's reusable storage
//! - Walking a full 1-RTT payload of mixed frames
//!
//! Run with: cargo bench -p quicd-wire --bench frame_parser

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use quicd_wire::frames::*;
use quicd_wire::types::StreamId;
use quicd_wire::{EncryptionLevel, VERSION_1};

fn encode(frames: &[Frame<'_>]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(1500);
    for frame in frames {
        frame.append(&mut buf, VERSION_1).unwrap();
    }
    buf
}

/// Benchmark STREAM decode across payload sizes
fn bench_stream_decode(c: &mut Criterion) {
    let parser = FrameParser::default();
    let mut group = c.benchmark_group("stream_decode");

    for size in [64usize, 512, 1200] {
        let data = vec![0xab; size];
        let buf = encode(&[Frame::Stream(StreamFrame {
            stream_id: StreamId::new(4),
            offset: 0x10000,
            fin: false,
            data_len_present: true,
            data: &data,
        })]);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &buf, |b, buf| {
            b.iter(|| {
                let (frame_type, consumed) = parser
                    .peek_type(black_box(buf), EncryptionLevel::OneRtt)
                    .unwrap()
                    .unwrap();
                black_box(parser.decode_stream(frame_type, &buf[consumed..], VERSION_1).unwrap())
            })
        });
    }
    group.finish();
}

/// Benchmark ACK decode with a growing number of ranges
fn bench_ack_decode(c: &mut Criterion) {
    let mut parser = FrameParser::default();
    let mut group = c.benchmark_group("ack_decode");

    for num_ranges in [1u64, 4, 16] {
        let ranges: Vec<AckRange> = (0..num_ranges)
            .rev()
            .map(|i| AckRange::new(i * 10 + 1, i * 10 + 5))
            .collect();
        let ack = AckFrame::with_ranges(&ranges, Duration::from_millis(25));
        let buf = encode(&[Frame::Ack(&ack)]);

        group.bench_with_input(BenchmarkId::from_parameter(num_ranges), &buf, |b, buf| {
            b.iter(|| {
                let body = black_box(&buf[1..]);
                let (ack, consumed) = parser
                    .decode_ack(FrameType::Ack, body, EncryptionLevel::OneRtt, VERSION_1)
                    .unwrap();
                black_box((ack.largest_acked(), consumed))
            })
        });
    }
    group.finish();
}

/// Benchmark a full packet payload (simulates the receive loop)
fn bench_mixed_payload(c: &mut Criterion) {
    let ack = AckFrame::with_ranges(
        &[AckRange::new(90, 100), AckRange::new(10, 80)],
        Duration::from_millis(1),
    );
    let chunk = [0x42u8; 100];
    let mut frames = vec![
        Frame::Ack(&ack),
        Frame::MaxData(MaxDataFrame {
            maximum_data: 1 << 24,
        }),
    ];
    for i in 0..10u64 {
        frames.push(Frame::Stream(StreamFrame {
            stream_id: StreamId::new(i * 4),
            offset: i * 100,
            fin: false,
            data_len_present: true,
            data: &chunk,
        }));
    }
    frames.push(Frame::Ping);
    let buf = encode(&frames);
    let num_frames = frames.len() as u64;

    let mut parser = FrameParser::new(true, true);
    let mut group = c.benchmark_group("mixed_payload");
    group.throughput(Throughput::Elements(num_frames));
    group.bench_function("for_each_frame", |b| {
        b.iter(|| {
            parser
                .for_each_frame(black_box(&buf), EncryptionLevel::OneRtt, VERSION_1, |frame| {
                    black_box(frame);
                    Ok(())
                })
                .unwrap()
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_stream_decode,
    bench_ack_decode,
    bench_mixed_payload,
);
criterion_main!(benches);
