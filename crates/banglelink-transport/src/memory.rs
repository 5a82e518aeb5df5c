use bytes::Bytes;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// In-memory transport that records every write it receives.
///
/// Used by tests and by the CLI to show how an outbound message is split
/// before it reaches the radio.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    writes: Vec<Bytes>,
    max_write_size: Option<usize>,
    closed: bool,
}

impl RecordingTransport {
    /// Create a transport with no write size limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that rejects writes larger than `max`.
    pub fn with_max_write_size(max: usize) -> Self {
        Self {
            max_write_size: Some(max),
            ..Self::default()
        }
    }

    /// Every write received so far, in order.
    pub fn writes(&self) -> &[Bytes] {
        &self.writes
    }

    /// All written bytes concatenated in write order.
    pub fn concat(&self) -> Vec<u8> {
        self.writes.iter().flat_map(|w| w.iter().copied()).collect()
    }

    /// Drain the recorded writes.
    pub fn take(&mut self) -> Vec<Bytes> {
        std::mem::take(&mut self.writes)
    }

    /// Make subsequent writes fail with [`TransportError::Closed`].
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Transport for RecordingTransport {
    fn write(&mut self, packet: &[u8]) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if let Some(max) = self.max_write_size {
            if packet.len() > max {
                return Err(TransportError::WriteTooLarge {
                    size: packet.len(),
                    max,
                });
            }
        }
        self.writes.push(Bytes::copy_from_slice(packet));
        Ok(())
    }

    fn max_write_size(&self) -> Option<usize> {
        self.max_write_size
    }
}
