//! Frame parser configuration.
//!
//! Extension support is negotiated through transport parameters
//! (`max_datagram_frame_size` for RFC 9221, `reset_stream_at` for the
//! reliable-reset extension) and is fixed for the lifetime of a connection.
//! The ACK delay exponent is the peer's `ack_delay_exponent` transport
//! parameter and may be applied after the parser is created.

use serde::{Deserialize, Serialize};

/// Default ACK delay exponent (RFC 9000 Section 18.2).
///
/// Applies to ACK frames in Initial and Handshake packets regardless of the
/// negotiated value, and to every ACK frame this crate encodes.
pub const DEFAULT_ACK_DELAY_EXPONENT: u8 = 3;

/// Largest ACK delay exponent a peer may advertise (RFC 9000 Section 18.2).
pub const MAX_ACK_DELAY_EXPONENT: u8 = 20;

/// Frame parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameParserConfig {
    /// Accept DATAGRAM frames (0x30, 0x31).
    ///
    /// When disabled, both type codes are rejected as unknown.
    ///
    /// **Default:** `false`
    pub enable_datagrams: bool,

    /// Accept RESET_STREAM_AT frames (0x24).
    ///
    /// **Default:** `false`
    pub enable_reset_stream_at: bool,

    /// Exponent used to scale the ACK Delay field of 1-RTT ACK frames.
    ///
    /// **Default:** `3`
    pub ack_delay_exponent: u8,
}

impl Default for FrameParserConfig {
    fn default() -> Self {
        Self {
            enable_datagrams: false,
            enable_reset_stream_at: false,
            ack_delay_exponent: DEFAULT_ACK_DELAY_EXPONENT,
        }
    }
}

impl FrameParserConfig {
    /// Validate the configuration.
    ///
    /// Returns `Ok(())` if valid, or a list of error messages if invalid.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.ack_delay_exponent > MAX_ACK_DELAY_EXPONENT {
            errors.push(format!(
                "ack_delay_exponent must be <= {} (got {})",
                MAX_ACK_DELAY_EXPONENT, self.ack_delay_exponent
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
