/// Errors that can occur while handing writes to the transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single write exceeded what the link accepts.
    #[error("write too large ({size} bytes, max {max})")]
    WriteTooLarge { size: usize, max: usize },

    /// The link went away while writes were pending.
    #[error("transport closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
