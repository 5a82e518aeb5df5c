/// Errors surfaced by session operations.
///
/// Inbound problems never appear here: a bad line is reported to the
/// [`EventSink`](crate::EventSink) and the session keeps going.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Framing or transport failure on an outbound write.
    #[error("frame error: {0}")]
    Frame(#[from] banglelink_frame::FrameError),

    /// The outbound event could not be encoded.
    #[error("protocol error: {0}")]
    Proto(#[from] banglelink_proto::ProtoError),

    /// The command queue is full. Carries the undelivered fragment so the
    /// caller can retry it.
    #[error("session queue full ({} byte fragment not queued)", .0.len())]
    Busy(Vec<u8>),

    /// The session task has stopped.
    #[error("session closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, SessionError>;
