use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::{ProtoError, Result};
use crate::inbound::{CallControl, InboundEvent, MusicControl, Severity, StatusUpdate};
use crate::wire::{MessageKind, WireMessage, MSG_CALL, MSG_MUSIC};

#[derive(Deserialize)]
struct NoticeBody {
    msg: String,
}

#[derive(Deserialize)]
struct StatusBody {
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    bat: Option<f64>,
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    volt: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

/// Firmware builds differ on whether status numbers are quoted.
fn number_or_numeric_string<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Number(n)) => Ok(Some(n)),
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected a number, found {text:?}"))),
    }
}

#[derive(Deserialize)]
struct FindPhoneBody {
    #[serde(default)]
    n: Option<bool>,
}

#[derive(Deserialize)]
struct ControlBody {
    n: String,
}

/// Maps decoded wire messages to inbound events.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDispatcher;

impl EventDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Validate `msg` against the schema its discriminator selects.
    ///
    /// Unknown discriminators yield [`InboundEvent::Unrecognized`]; a known
    /// discriminator with missing or invalid fields is a decode error.
    pub fn dispatch(&self, msg: &WireMessage) -> Result<InboundEvent> {
        let kind = msg.kind();
        let event = match kind {
            MessageKind::Info => notice(msg, kind, Severity::Info)?,
            MessageKind::Warn => notice(msg, kind, Severity::Warn)?,
            MessageKind::Error => notice(msg, kind, Severity::Error)?,
            MessageKind::Status => {
                let body: StatusBody = body(msg, kind)?;
                InboundEvent::StatusUpdate(StatusUpdate {
                    battery_percent: body.bat.map(clamp_percent),
                    voltage: body.volt.map(|v| v as f32),
                })
            }
            MessageKind::FindPhone => {
                let body: FindPhoneBody = body(msg, kind)?;
                InboundEvent::FindPhoneRequest {
                    start: body.n.unwrap_or(false),
                }
            }
            MessageKind::Music => {
                let body: ControlBody = body(msg, kind)?;
                let command =
                    MusicControl::from_wire(&body.n).ok_or_else(|| ProtoError::UnknownCommand {
                        kind: MSG_MUSIC,
                        value: body.n.clone(),
                    })?;
                InboundEvent::MusicControlRequest { command }
            }
            MessageKind::Call => {
                let body: ControlBody = body(msg, kind)?;
                let command =
                    CallControl::from_wire(&body.n).ok_or_else(|| ProtoError::UnknownCommand {
                        kind: MSG_CALL,
                        value: body.n.clone(),
                    })?;
                InboundEvent::CallControlRequest { command }
            }
            MessageKind::Unknown => {
                debug!(t = ?msg.discriminator(), "ignoring unrecognized message");
                InboundEvent::Unrecognized {
                    discriminator: msg.discriminator().map(str::to_string),
                }
            }
        };
        Ok(event)
    }
}

fn notice(msg: &WireMessage, kind: MessageKind, severity: Severity) -> Result<InboundEvent> {
    let body: NoticeBody = body(msg, kind)?;
    Ok(InboundEvent::Notice {
        severity,
        message: body.msg,
    })
}

fn body<T: DeserializeOwned>(msg: &WireMessage, kind: MessageKind) -> Result<T> {
    T::deserialize(Value::Object(msg.as_object().clone())).map_err(|source| {
        ProtoError::InvalidMessage {
            kind: kind.as_str().unwrap_or("unknown"),
            source,
        }
    })
}

fn clamp_percent(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.clamp(0.0, 100.0) as u8
}
