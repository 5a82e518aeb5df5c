/// Errors raised while encoding or decoding protocol messages.
///
/// None of these are fatal to a session: an encode error aborts one write,
/// a decode error drops one line.
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    /// The outbound message could not be serialized.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// An alarm time cannot be represented on the device.
    #[error("alarm time out of range ({hour:02}:{minute:02})")]
    InvalidAlarm { hour: u8, minute: u8 },

    /// An inbound line starting with `{` is not valid JSON.
    #[error("malformed JSON from device: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// An inbound line parsed as JSON but not as an object.
    #[error("JSON line from device is not an object")]
    NotAnObject,

    /// A required field is missing or has the wrong type.
    #[error("invalid '{kind}' message: {source}")]
    InvalidMessage {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// An enumerated control name is not one the host knows.
    #[error("unknown {kind} command '{value}'")]
    UnknownCommand { kind: &'static str, value: String },
}

impl ProtoError {
    /// Whether this error came from an inbound line.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ProtoError::MalformedJson(_)
                | ProtoError::NotAnObject
                | ProtoError::InvalidMessage { .. }
                | ProtoError::UnknownCommand { .. }
        )
    }

    /// Whether this error came from an outbound message.
    pub fn is_encode(&self) -> bool {
        matches!(
            self,
            ProtoError::Encode(_) | ProtoError::InvalidAlarm { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ProtoError>;
