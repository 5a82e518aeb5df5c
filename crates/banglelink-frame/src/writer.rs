use banglelink_transport::Transport;
use bytes::Bytes;
use tracing::{debug, trace};

use crate::codec::{split_frames, Frame, FrameConfig};
use crate::error::{FrameError, Result};

/// Splits outbound byte sequences into frames and writes them in order.
///
/// A single [`FrameWriter::write`] call emits all of its frames before it
/// returns, so frames from two messages never interleave as long as the
/// writer has one owner.
pub struct FrameWriter<T> {
    inner: T,
    config: FrameConfig,
    frames_written: u64,
}

impl<T: Transport> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            frames_written: 0,
        }
    }

    /// Split `bytes` into frames and write each one.
    ///
    /// Returns the number of frames written. Empty input writes nothing.
    /// A transport failure aborts the remaining frames of this call; it is
    /// not retried here.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.write_bytes(Bytes::copy_from_slice(bytes))
    }

    /// Like [`FrameWriter::write`], slicing frames out of `bytes` without copying.
    pub fn write_bytes(&mut self, bytes: Bytes) -> Result<usize> {
        let len = bytes.len();
        let frames = split_frames(bytes, self.frame_size()?)?;

        for frame in &frames {
            self.write_one(frame)?;
        }

        debug!(len, frames = frames.len(), "write complete");
        Ok(frames.len())
    }

    /// Write one pre-split frame as a single transport write.
    ///
    /// Fails with [`FrameError::FrameTooLarge`] if the frame exceeds the
    /// effective frame size.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let max = self.frame_size()?;
        if frame.len() > max {
            return Err(FrameError::FrameTooLarge {
                size: frame.len(),
                max,
            });
        }
        self.write_one(frame)
    }

    fn write_one(&mut self, frame: &Frame) -> Result<()> {
        trace!(len = frame.len(), "writing frame");
        self.inner.write(frame.as_bytes())?;
        self.frames_written += 1;
        Ok(())
    }

    /// Effective frame size: the configured size, capped by the transport.
    pub fn frame_size(&self) -> Result<usize> {
        self.config.validate()?;
        Ok(match self.inner.max_write_size() {
            Some(limit) if limit > 0 => self.config.max_frame_size.min(limit),
            _ => self.config.max_frame_size,
        })
    }

    /// Total frames written since creation.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the transport.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update the frame size for subsequent writes.
    pub fn set_max_frame_size(&mut self, max_frame_size: usize) {
        self.config.max_frame_size = max_frame_size;
    }

    /// Current writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use banglelink_transport::{RecordingTransport, TransportError};

    use super::*;
    use crate::codec::MAX_FRAME_SIZE;

    #[test]
    fn write_short_message_is_one_frame() {
        let mut writer = FrameWriter::new(RecordingTransport::new());
        assert_eq!(writer.write(b"hello").unwrap(), 1);

        let transport = writer.into_inner();
        assert_eq!(transport.writes().len(), 1);
        assert_eq!(transport.writes()[0].as_ref(), b"hello");
    }

    #[test]
    fn write_long_message_splits_at_twenty() {
        let data = b"\x10setTime(1700000000);E.setTimeZone(1);\n";
        let mut writer = FrameWriter::new(RecordingTransport::new());
        let frames = writer.write(data).unwrap();

        let transport = writer.into_inner();
        assert_eq!(frames, transport.writes().len());
        assert!(transport.writes().iter().all(|w| w.len() <= MAX_FRAME_SIZE));
        assert_eq!(transport.concat(), data);
    }

    #[test]
    fn write_empty_emits_nothing() {
        let mut writer = FrameWriter::new(RecordingTransport::new());
        assert_eq!(writer.write(b"").unwrap(), 0);
        assert!(writer.get_ref().writes().is_empty());
    }

    #[test]
    fn consecutive_writes_stay_contiguous() {
        let mut writer = FrameWriter::new(RecordingTransport::new());
        let first = vec![b'a'; 45];
        let second = vec![b'b'; 25];

        writer.write(&first).unwrap();
        writer.write(&second).unwrap();

        let writes = writer.into_inner().take();
        let lens: Vec<usize> = writes.iter().map(|w| w.len()).collect();
        assert_eq!(lens, vec![20, 20, 5, 20, 5]);
        assert!(writes[..3].iter().all(|w| w.iter().all(|b| *b == b'a')));
        assert!(writes[3..].iter().all(|w| w.iter().all(|b| *b == b'b')));
    }

    #[test]
    fn transport_limit_caps_frame_size() {
        let mut writer = FrameWriter::new(RecordingTransport::with_max_write_size(8));
        assert_eq!(writer.frame_size().unwrap(), 8);
        assert_eq!(writer.write(&[0u8; 17]).unwrap(), 3);
    }

    #[test]
    fn zero_frame_size_rejected() {
        let cfg = FrameConfig {
            max_frame_size: 0,
            ..FrameConfig::default()
        };
        let mut writer = FrameWriter::with_config(RecordingTransport::new(), cfg);
        assert!(matches!(
            writer.write(b"x"),
            Err(FrameError::InvalidFrameSize(0))
        ));
    }

    #[test]
    fn transport_error_propagates() {
        let mut transport = RecordingTransport::new();
        transport.close();
        let mut writer = FrameWriter::new(transport);

        let err = writer.write(b"x").unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Closed)
        ));
        assert_eq!(writer.frames_written(), 0);
    }

    #[test]
    fn write_frame_is_one_transport_write() {
        let frames = split_frames(Bytes::from_static(b"abc"), MAX_FRAME_SIZE).unwrap();
        let mut writer = FrameWriter::new(RecordingTransport::new());
        writer.write_frame(&frames[0]).unwrap();

        assert_eq!(writer.frames_written(), 1);
        assert_eq!(writer.get_ref().writes().len(), 1);
        assert_eq!(writer.get_ref().concat(), b"abc");
    }

    #[test]
    fn write_frame_rejects_frame_over_limit() {
        let frames = split_frames(Bytes::from_static(b"abcdefgh"), 8).unwrap();
        let mut writer = FrameWriter::new(RecordingTransport::with_max_write_size(4));

        let err = writer.write_frame(&frames[0]).unwrap_err();
        assert!(matches!(err, FrameError::FrameTooLarge { size: 8, max: 4 }));
        assert!(writer.get_ref().writes().is_empty());
    }

    #[test]
    fn write_bytes_splits_owned_buffer() {
        let data = Bytes::from(vec![b'z'; 30]);
        let mut writer = FrameWriter::new(RecordingTransport::new());
        assert_eq!(writer.write_bytes(data.clone()).unwrap(), 2);
        assert_eq!(writer.frames_written(), 2);
        assert_eq!(writer.get_ref().concat(), data.as_ref());
    }

    #[test]
    fn set_max_frame_size_applies_to_next_write() {
        let mut writer = FrameWriter::new(RecordingTransport::new());
        writer.set_max_frame_size(4);
        assert_eq!(writer.config().max_frame_size, 4);
        assert_eq!(writer.write(b"12345678").unwrap(), 2);

        let writes = writer.get_mut().take();
        assert_eq!(writes.len(), 2);
        assert!(writes.iter().all(|w| w.len() == 4));
        assert!(writer.get_ref().writes().is_empty());
    }
}
