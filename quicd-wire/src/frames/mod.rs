//! # QUIC Frames (RFC 9000 Section 12.4, 19; RFC 9221)
//!
//! Frame type table, typed frame values, the body codec and the
//! per-connection [`FrameParser`]. Payloads borrow the packet buffer via
//! lifetimes.

pub mod ack;
pub mod codec;
pub mod frame_type;
pub mod parse;
pub mod types;

mod reader;

pub use ack::{AckFrame, AckRange, EcnCounts};
pub use frame_type::{is_stream_frame_type, FrameType, StreamFlags};
pub use parse::FrameParser;
pub use types::*;
