use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::error::{Result, TransportError};

/// An ordered, write-size-limited byte sink.
///
/// Each call to [`Transport::write`] is one write on the link (one GATT
/// write on the UART TX characteristic). Implementations must issue writes
/// in the order they are called; completion ordering beyond that is the
/// owner's concern.
pub trait Transport {
    /// Issue one write.
    fn write(&mut self, packet: &[u8]) -> Result<()>;

    /// Largest write the link accepts, if it enforces one.
    fn max_write_size(&self) -> Option<usize> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, packet: &[u8]) -> Result<()> {
        (**self).write(packet)
    }

    fn max_write_size(&self) -> Option<usize> {
        (**self).max_write_size()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, packet: &[u8]) -> Result<()> {
        (**self).write(packet)
    }

    fn max_write_size(&self) -> Option<usize> {
        (**self).max_write_size()
    }
}

/// Adapts any `Write` stream (serial device node, pipe, stdout) to [`Transport`].
///
/// Every packet is written completely and flushed before the call returns,
/// so packet boundaries survive on stream types that honour flushes.
/// `WouldBlock` from a non-blocking stream is returned as
/// [`TransportError::Io`]; only `Interrupted` is retried.
pub struct IoTransport<W> {
    inner: W,
    max_write_size: Option<usize>,
}

impl<W: Write> IoTransport<W> {
    /// Wrap a stream with no write size limit.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            max_write_size: None,
        }
    }

    /// Wrap a stream that rejects packets larger than `max`.
    pub fn with_max_write_size(inner: W, max: usize) -> Self {
        Self {
            inner,
            max_write_size: Some(max),
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the transport and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<W: Write> Transport for IoTransport<W> {
    fn write(&mut self, packet: &[u8]) -> Result<()> {
        if let Some(max) = self.max_write_size {
            if packet.len() > max {
                return Err(TransportError::WriteTooLarge {
                    size: packet.len(),
                    max,
                });
            }
        }

        let mut offset = 0usize;
        while offset < packet.len() {
            match self.inner.write(&packet[offset..]) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        trace!(len = packet.len(), "packet written");

        self.flush()
    }

    fn max_write_size(&self) -> Option<usize> {
        self.max_write_size
    }
}
