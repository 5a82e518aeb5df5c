use std::fmt;
use std::io;

use banglelink_frame::FrameError;
use banglelink_proto::ProtoError;
use banglelink_session::SessionError;
use banglelink_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => USAGE,
        io::ErrorKind::InvalidData => DATA_INVALID,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::Io(source) => io_error(context, source),
        FrameError::InvalidFrameSize(_) | FrameError::InvalidLineLength(_) => {
            CliError::new(USAGE, format!("{context}: {err}"))
        }
        FrameError::FrameTooLarge { .. } => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        FrameError::LineTooLong { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn proto_error(context: &str, err: ProtoError) -> CliError {
    if err.is_encode() || err.is_decode() {
        return CliError::new(DATA_INVALID, format!("{context}: {err}"));
    }
    CliError::new(INTERNAL, format!("{context}: {err}"))
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Frame(err) => frame_error(context, err),
        SessionError::Proto(err) => proto_error(context, err),
        SessionError::Busy(_) | SessionError::Closed => {
            CliError::new(FAILURE, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_frame_size_is_usage() {
        let err = session_error("encode", SessionError::Frame(FrameError::InvalidFrameSize(0)));
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("encode: "));
    }

    #[test]
    fn alarm_out_of_range_is_data_invalid() {
        let err = proto_error(
            "encode",
            ProtoError::InvalidAlarm {
                hour: 25,
                minute: 0,
            },
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn line_limits_map_to_usage_and_data() {
        let err = frame_error("decode", FrameError::InvalidLineLength(0));
        assert_eq!(err.code, USAGE);
        let err = frame_error("decode", FrameError::LineTooLong { len: 9000, max: 8192 });
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn transport_closed_is_failure() {
        let err = frame_error("write", FrameError::Transport(TransportError::Closed));
        assert_eq!(err.code, FAILURE);
        let err = transport_error("write", TransportError::WriteTooLarge { size: 30, max: 20 });
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
