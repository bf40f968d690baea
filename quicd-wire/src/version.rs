//! # QUIC Versions (RFC 9000 Section 15, RFC 9369)
//!
//! Every decode and encode routine receives the version of the packet the
//! frames travel in. Version 1 and version 2 share the same frame format;
//! the parameter exists so a future version can change a frame layout
//! without touching call sites.

#![forbid(unsafe_code)]

/// QUIC protocol version as carried in long headers.
pub type Version = u32;

/// QUIC Version 1 (RFC 9000)
pub const VERSION_1: Version = 0x00000001;

/// Version 2 (RFC 9369)
///
/// Functionally identical to Version 1 at the frame layer.
pub const VERSION_2: Version = 0x6b3343cf;
