use bytes::BytesMut;
use tracing::{trace, warn};

use crate::codec::{Line, LineEnding, LineSplitter, DEFAULT_MAX_LINE_LENGTH};
use crate::error::Result;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Reassembles newline-terminated lines from arbitrarily split fragments.
///
/// Fragments may split a line anywhere, including between `\r` and `\n`.
/// After every [`LineAssembler::feed`] the buffer holds at most one partial
/// line: every complete line has been returned.
///
/// Bytes are buffered raw and only interpreted as text once a line is
/// complete, so multi-byte UTF-8 characters survive being split across
/// deliveries.
///
/// The partial line is capped at the configured maximum line length. A
/// line that outgrows it is reported as
/// [`FrameError::LineTooLong`](crate::FrameError::LineTooLong) and its
/// remaining bytes are skipped up to the next `\n`.
#[derive(Debug)]
pub struct LineAssembler {
    buf: BytesMut,
    splitter: LineSplitter,
}

impl LineAssembler {
    /// Create an assembler that yields full line content.
    pub fn new() -> Self {
        Self::with_line_ending(LineEnding::default())
    }

    /// Create an assembler with an explicit line ending policy.
    pub fn with_line_ending(ending: LineEnding) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            splitter: LineSplitter::new(ending, DEFAULT_MAX_LINE_LENGTH),
        }
    }

    /// Set the longest line accepted, terminator excluded.
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.splitter = LineSplitter::new(self.splitter.ending(), max_line_length.max(1));
        self
    }

    /// Append a fragment and return every line it completes, in order.
    ///
    /// Over-long lines appear as errors at the position they occupied in
    /// the stream; lines around them are unaffected.
    pub fn feed(&mut self, fragment: &[u8]) -> Vec<Result<Line>> {
        trace!(len = fragment.len(), buffered = self.buf.len(), "fragment received");
        self.buf.extend_from_slice(fragment);

        let mut lines = Vec::new();
        while let Some(line) = self.splitter.next_line(&mut self.buf) {
            if let Err(err) = &line {
                warn!(error = %err, "dropping inbound line");
            }
            lines.push(line);
        }
        lines
    }

    /// The buffered partial line.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Whether no partial line is buffered.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether the rest of an over-long line is being skipped.
    pub fn is_discarding(&self) -> bool {
        self.splitter.is_discarding()
    }

    /// Discard the buffered partial line, returning how many bytes were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.buf.len();
        self.buf.clear();
        self.splitter.reset();
        dropped
    }

    /// Active line ending policy.
    pub fn line_ending(&self) -> LineEnding {
        self.splitter.ending()
    }

    /// Longest line accepted, terminator excluded.
    pub fn max_line_length(&self) -> usize {
        self.splitter.max_line_length()
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}
