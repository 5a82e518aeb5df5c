//! Framing for the device's UART-over-BLE link.
//!
//! Two directions, two very different shapes:
//! - Outbound, a byte sequence is cut into frames of at most
//!   [`MAX_FRAME_SIZE`] bytes, each issued as one transport write.
//! - Inbound, notifications arrive as fragments of at most 20 bytes with no
//!   alignment to protocol lines; [`LineAssembler`] buffers them and yields
//!   complete newline-terminated lines, dropping any line longer than
//!   [`FrameConfig::max_line_length`].

pub mod assembler;
pub mod codec;
pub mod error;
#[cfg(feature = "async")]
pub mod line_codec;
pub mod writer;

pub use assembler::LineAssembler;
pub use codec::{
    split_frames, Frame, FrameConfig, Line, LineEnding, DEFAULT_MAX_LINE_LENGTH, LINE_DELIMITER,
    MAX_FRAME_SIZE,
};
pub use error::{FrameError, Result};
#[cfg(feature = "async")]
pub use line_codec::LineCodec;
pub use writer::FrameWriter;
