use std::borrow::Cow;

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Largest payload the UART TX characteristic accepts per write.
pub const MAX_FRAME_SIZE: usize = 20;

/// Terminates every protocol line in both directions.
pub const LINE_DELIMITER: u8 = b'\n';

/// One bounded-size unit of an outbound write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
}

impl Frame {
    /// The frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    /// Frame length in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the frame carries no bytes. Never true for frames produced
    /// by [`split_frames`].
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Consume the frame and return its bytes.
    pub fn into_bytes(self) -> Bytes {
        self.payload
    }
}

/// Split `data` into consecutive frames of at most `max_frame_size` bytes.
///
/// Concatenating the returned frames reproduces `data`. Empty input yields
/// no frames. Slicing is zero-copy.
pub fn split_frames(data: impl Into<Bytes>, max_frame_size: usize) -> Result<Vec<Frame>> {
    if max_frame_size == 0 {
        return Err(FrameError::InvalidFrameSize(max_frame_size));
    }

    let mut data = data.into();
    let mut frames = Vec::with_capacity(data.len().div_ceil(max_frame_size));
    while !data.is_empty() {
        let n = data.len().min(max_frame_size);
        frames.push(Frame {
            payload: data.split_to(n),
        });
    }
    Ok(frames)
}

/// How a line's content is cut from the bytes preceding its `\n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Everything before the `\n`.
    #[default]
    Lf,
    /// Everything before the `\n`, minus one trailing `\r` if present.
    CrLf,
    /// Drops the byte immediately before every `\n`, matching older hosts
    /// that always assumed a CRLF console. Only for peers that depend on it.
    LegacyTruncate,
}

/// A complete line with its terminator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line(Bytes);

impl Line {
    /// Build a line from raw content (no terminator).
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self(content.into())
    }

    /// Raw line bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Line text; invalid UTF-8 sequences are replaced.
    pub fn to_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the line is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the line and return its bytes.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl From<&str> for Line {
    fn from(value: &str) -> Self {
        Self(Bytes::copy_from_slice(value.as_bytes()))
    }
}

/// Default cap on one inbound line, terminator excluded.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8 * 1024;

/// Incremental line extraction over a buffer that only grows at the end.
///
/// Remembers how far the buffer has been searched, so each delivery scans
/// only the bytes it added. A line longer than `max_line_length` is
/// reported once and then skipped up to its terminator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineSplitter {
    ending: LineEnding,
    max_line_length: usize,
    next_index: usize,
    discarding: bool,
}

impl LineSplitter {
    pub(crate) fn new(ending: LineEnding, max_line_length: usize) -> Self {
        Self {
            ending,
            max_line_length,
            next_index: 0,
            discarding: false,
        }
    }

    pub(crate) fn ending(&self) -> LineEnding {
        self.ending
    }

    pub(crate) fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Whether bytes are being dropped until the next terminator.
    pub(crate) fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Forget scan progress after the caller emptied the buffer.
    pub(crate) fn reset(&mut self) {
        self.next_index = 0;
        self.discarding = false;
    }

    /// Take the next complete line from `src`.
    ///
    /// Returns `None` once `src` holds no terminator. An over-long line is
    /// consumed and returned as [`FrameError::LineTooLong`].
    pub(crate) fn next_line(&mut self, src: &mut BytesMut) -> Option<Result<Line>> {
        loop {
            let found = src[self.next_index..]
                .iter()
                .position(|b| *b == LINE_DELIMITER)
                .map(|offset| self.next_index + offset);

            match (self.discarding, found) {
                (true, Some(pos)) => {
                    src.advance(pos + 1);
                    self.reset();
                }
                (true, None) => {
                    src.clear();
                    self.next_index = 0;
                    return None;
                }
                (false, Some(pos)) => {
                    self.next_index = 0;
                    if pos > self.max_line_length {
                        src.advance(pos + 1);
                        return Some(Err(FrameError::LineTooLong {
                            len: pos,
                            max: self.max_line_length,
                        }));
                    }
                    return Some(Ok(take_line(src, pos, self.ending)));
                }
                (false, None) => {
                    if src.len() > self.max_line_length {
                        let len = src.len();
                        src.clear();
                        self.next_index = 0;
                        self.discarding = true;
                        return Some(Err(FrameError::LineTooLong {
                            len,
                            max: self.max_line_length,
                        }));
                    }
                    self.next_index = src.len();
                    return None;
                }
            }
        }
    }
}

/// Split off the line whose `\n` sits at `pos`, applying `ending`.
fn take_line(src: &mut BytesMut, pos: usize, ending: LineEnding) -> Line {
    let mut content = src.split_to(pos + 1);
    content.truncate(pos);

    match ending {
        LineEnding::Lf => {}
        LineEnding::CrLf => {
            if content.last() == Some(&b'\r') {
                content.truncate(pos - 1);
            }
        }
        LineEnding::LegacyTruncate => {
            content.truncate(pos.saturating_sub(1));
        }
    }

    Line(content.freeze())
}

/// Framing limits for both directions of the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Maximum bytes per transport write. Default: 20.
    pub max_frame_size: usize,
    /// Longest inbound line accepted, terminator excluded. Default: 8 KiB.
    pub max_line_length: usize,
}

impl FrameConfig {
    /// Reject configurations that cannot make progress.
    pub fn validate(&self) -> Result<()> {
        if self.max_frame_size == 0 {
            return Err(FrameError::InvalidFrameSize(self.max_frame_size));
        }
        if self.max_line_length == 0 {
            return Err(FrameError::InvalidLineLength(self.max_line_length));
        }
        Ok(())
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_frame_size: MAX_FRAME_SIZE,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_exact_multiple() {
        let frames = split_frames(Bytes::from(vec![7u8; 40]), MAX_FRAME_SIZE).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.len() == 20));
    }

    #[test]
    fn split_short_tail() {
        let data = b"\x10GB({\"t\":\"find\",\"n\":true})\n";
        let frames = split_frames(Bytes::from_static(data), MAX_FRAME_SIZE).unwrap();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), 20);
        assert_eq!(frames[1].len(), data.len() - 20);

        let joined: Vec<u8> = frames.iter().flat_map(|f| f.as_bytes().to_vec()).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn split_empty_is_no_frames() {
        let frames = split_frames(Bytes::new(), MAX_FRAME_SIZE).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn split_rejects_zero_size() {
        let err = split_frames(Bytes::from_static(b"x"), 0).unwrap_err();
        assert!(matches!(err, FrameError::InvalidFrameSize(0)));
    }

    fn splitter(ending: LineEnding) -> LineSplitter {
        LineSplitter::new(ending, DEFAULT_MAX_LINE_LENGTH)
    }

    fn next(split: &mut LineSplitter, buf: &mut BytesMut) -> Option<Line> {
        split.next_line(buf).map(|r| r.unwrap())
    }

    #[test]
    fn extract_needs_delimiter() {
        let mut buf = BytesMut::from(&b"{\"t\":\"info\""[..]);
        assert!(next(&mut splitter(LineEnding::Lf), &mut buf).is_none());
        assert_eq!(buf.len(), 11);
    }

    #[test]
    fn extract_leaves_remainder() {
        let mut buf = BytesMut::from(&b"first\nsec"[..]);
        let line = next(&mut splitter(LineEnding::Lf), &mut buf).unwrap();
        assert_eq!(line.as_bytes(), b"first");
        assert_eq!(&buf[..], b"sec");
    }

    #[test]
    fn extract_empty_line() {
        let mut buf = BytesMut::from(&b"\nnext\n"[..]);
        let line = next(&mut splitter(LineEnding::Lf), &mut buf).unwrap();
        assert!(line.is_empty());
        assert_eq!(&buf[..], b"next\n");
    }

    #[test]
    fn crlf_strips_carriage_return_only_when_present() {
        let mut split = splitter(LineEnding::CrLf);
        let mut buf = BytesMut::from(&b"a\r\nb\n"[..]);
        assert_eq!(next(&mut split, &mut buf).unwrap().as_bytes(), b"a");
        assert_eq!(next(&mut split, &mut buf).unwrap().as_bytes(), b"b");
    }

    #[test]
    fn legacy_truncate_drops_preceding_byte() {
        let mut split = splitter(LineEnding::LegacyTruncate);
        let mut buf = BytesMut::from(&b"hello\n\n"[..]);
        assert_eq!(next(&mut split, &mut buf).unwrap().as_bytes(), b"hell");
        assert!(next(&mut split, &mut buf).unwrap().is_empty());
    }

    #[test]
    fn scan_resumes_after_searched_bytes() {
        let mut split = splitter(LineEnding::Lf);
        let mut buf = BytesMut::from(&b"abc"[..]);
        assert!(split.next_line(&mut buf).is_none());
        assert_eq!(split.next_index, 3);

        buf.extend_from_slice(b"de\nf");
        assert_eq!(next(&mut split, &mut buf).unwrap().as_bytes(), b"abcde");
        assert_eq!(split.next_index, 0);
        assert!(split.next_line(&mut buf).is_none());
        assert_eq!(split.next_index, 1);
    }

    #[test]
    fn complete_line_over_limit_is_skipped() {
        let mut split = LineSplitter::new(LineEnding::Lf, 4);
        let mut buf = BytesMut::from(&b"toolong\nok\n"[..]);

        let err = split.next_line(&mut buf).unwrap().unwrap_err();
        assert!(matches!(err, FrameError::LineTooLong { len: 7, max: 4 }));
        assert_eq!(next(&mut split, &mut buf).unwrap().as_bytes(), b"ok");
    }

    #[test]
    fn partial_line_over_limit_discards_until_newline() {
        let mut split = LineSplitter::new(LineEnding::Lf, 4);
        let mut buf = BytesMut::from(&b"abcdef"[..]);

        let err = split.next_line(&mut buf).unwrap().unwrap_err();
        assert!(matches!(err, FrameError::LineTooLong { len: 6, max: 4 }));
        assert!(buf.is_empty());
        assert!(split.is_discarding());

        buf.extend_from_slice(b"ghij");
        assert!(split.next_line(&mut buf).is_none());
        assert!(buf.is_empty());

        buf.extend_from_slice(b"k\nnext\n");
        assert_eq!(next(&mut split, &mut buf).unwrap().as_bytes(), b"next");
        assert!(!split.is_discarding());
    }

    #[test]
    fn line_text_is_lossy() {
        let line = Line::new(Bytes::from_static(b"ok \xff"));
        assert_eq!(line.to_text(), "ok \u{fffd}");
    }

    #[test]
    fn default_config_matches_transport_limit() {
        let cfg = FrameConfig::default();
        assert_eq!(cfg.max_frame_size, 20);
        assert_eq!(cfg.max_line_length, DEFAULT_MAX_LINE_LENGTH);
        assert!(cfg.validate().is_ok());

        let no_frames = FrameConfig {
            max_frame_size: 0,
            ..FrameConfig::default()
        };
        assert!(matches!(
            no_frames.validate(),
            Err(FrameError::InvalidFrameSize(0))
        ));

        let no_lines = FrameConfig {
            max_line_length: 0,
            ..FrameConfig::default()
        };
        assert!(matches!(
            no_lines.validate(),
            Err(FrameError::InvalidLineLength(0))
        ));
    }
}
