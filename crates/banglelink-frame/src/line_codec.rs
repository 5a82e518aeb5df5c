use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{Line, LineEnding, LineSplitter, DEFAULT_MAX_LINE_LENGTH, LINE_DELIMITER};
use crate::error::FrameError;

/// `tokio_util` codec over newline-terminated protocol lines.
///
/// Decoding applies the same extraction rules and length cap as
/// [`LineAssembler`](crate::LineAssembler); encoding appends the `\n`.
#[derive(Debug, Clone, Copy)]
pub struct LineCodec {
    splitter: LineSplitter,
}

impl LineCodec {
    /// Create a codec with an explicit line ending policy.
    pub fn new(ending: LineEnding) -> Self {
        Self::with_max_line_length(ending, DEFAULT_MAX_LINE_LENGTH)
    }

    /// Create a codec that rejects lines longer than `max_line_length`.
    pub fn with_max_line_length(ending: LineEnding, max_line_length: usize) -> Self {
        Self {
            splitter: LineSplitter::new(ending, max_line_length.max(1)),
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new(LineEnding::default())
    }
}

impl Decoder for LineCodec {
    type Item = Line;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        self.splitter.next_line(src).transpose()
    }
}

impl Encoder<Line> for LineCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Line, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len() + 1);
        dst.put_slice(item.as_bytes());
        dst.put_u8(LINE_DELIMITER);
        Ok(())
    }
}
