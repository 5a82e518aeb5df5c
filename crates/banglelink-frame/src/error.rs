/// Errors that can occur while framing outbound data or reading lines.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The configured frame size cannot carry any data.
    #[error("invalid max frame size {0} (must be at least 1)")]
    InvalidFrameSize(usize),

    /// The configured line cap cannot hold any line.
    #[error("invalid max line length {0} (must be at least 1)")]
    InvalidLineLength(usize),

    /// A pre-split frame is larger than the writer's frame size.
    #[error("frame of {size} bytes exceeds frame size {max}")]
    FrameTooLarge { size: usize, max: usize },

    /// An inbound line grew past the configured cap and was dropped.
    #[error("line too long: {len} bytes exceeds limit {max}")]
    LineTooLong { len: usize, max: usize },

    /// The transport rejected a frame write.
    #[error("frame write failed: {0}")]
    Transport(#[from] banglelink_transport::TransportError),

    /// An I/O error occurred on an async line stream.
    #[error("line I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
