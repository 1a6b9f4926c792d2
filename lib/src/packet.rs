//! Provides helpers for creating, sending and reading packets

use std::time::Duration;

use crate::error::Result;

pub mod arp_packet;
pub mod wire;

/// Default timing for throttling packet sends to prevent packet loss
pub const DEFAULT_PACKET_SEND_TIMING: Duration = Duration::from_micros(50);

/// Default upper bound on a single blocking read from the wire. Readers
/// return to their caller at least this often so cancellation is observed
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Trait describing a packet reader
pub trait Reader: Send {
    /// Should return the next packet off of the wire, or `None` when no
    /// packet arrived before the read timeout elapsed
    fn next_packet(&mut self) -> Result<Option<&[u8]>>;
}

/// Trait describing a packet sender
pub trait Sender: Send {
    /// Should send a packet over the wire
    fn send(&mut self, packet: &[u8]) -> Result<()>;
}

#[cfg(test)]
#[path = "./packet_tests.rs"]
#[doc(hidden)]
pub mod mocks;
