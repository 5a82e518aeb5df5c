use serde_json::{Map, Value};

use crate::error::{ProtoError, Result};

/// Name of the discriminator field carried by every message.
pub const TYPE_FIELD: &str = "t";

/// Device-bound: show a notification.
pub const MSG_NOTIFY: &str = "notify";
/// Device-bound: dismiss a notification.
pub const MSG_NOTIFY_DELETE: &str = "notify-";
/// Device-bound: replace the alarm list.
pub const MSG_ALARM: &str = "alarm";
/// Both directions: call state (device-bound) or call control (host-bound).
pub const MSG_CALL: &str = "call";
/// Device-bound: playback state.
pub const MSG_MUSIC_STATE: &str = "musicstate";
/// Device-bound: track metadata.
pub const MSG_MUSIC_INFO: &str = "musicinfo";
/// Device-bound: start or stop the find-my-watch buzzer.
pub const MSG_FIND: &str = "find";
/// Device-bound: constant vibration.
pub const MSG_VIBRATE: &str = "vibrate";
/// Device-bound: current weather.
pub const MSG_WEATHER: &str = "weather";
/// Host-bound: informational notice.
pub const MSG_INFO: &str = "info";
/// Host-bound: warning notice.
pub const MSG_WARN: &str = "warn";
/// Host-bound: error notice.
pub const MSG_ERROR: &str = "error";
/// Host-bound: battery status.
pub const MSG_STATUS: &str = "status";
/// Host-bound: ring the phone.
pub const MSG_FIND_PHONE: &str = "findPhone";
/// Host-bound: media control.
pub const MSG_MUSIC: &str = "music";

/// Host-bound message schemas, selected by the discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Info,
    Warn,
    Error,
    Status,
    FindPhone,
    Music,
    Call,
    /// Absent, non-string or unknown discriminator.
    Unknown,
}

impl MessageKind {
    /// Map a discriminator value to its schema.
    pub fn from_discriminator(t: Option<&str>) -> Self {
        match t {
            Some(MSG_INFO) => Self::Info,
            Some(MSG_WARN) => Self::Warn,
            Some(MSG_ERROR) => Self::Error,
            Some(MSG_STATUS) => Self::Status,
            Some(MSG_FIND_PHONE) => Self::FindPhone,
            Some(MSG_MUSIC) => Self::Music,
            Some(MSG_CALL) => Self::Call,
            _ => Self::Unknown,
        }
    }

    /// Wire discriminator, if the kind has one.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Self::Info => Some(MSG_INFO),
            Self::Warn => Some(MSG_WARN),
            Self::Error => Some(MSG_ERROR),
            Self::Status => Some(MSG_STATUS),
            Self::FindPhone => Some(MSG_FIND_PHONE),
            Self::Music => Some(MSG_MUSIC),
            Self::Call => Some(MSG_CALL),
            Self::Unknown => None,
        }
    }
}

/// One JSON object exchanged with the device.
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    fields: Map<String, Value>,
}

impl WireMessage {
    /// Wrap an already-parsed JSON object.
    pub fn from_object(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Parse JSON text into a message. Anything but an object is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text).map_err(ProtoError::MalformedJson)? {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(ProtoError::NotAnObject),
        }
    }

    /// The `t` field, if present and a string.
    pub fn discriminator(&self) -> Option<&str> {
        self.fields.get(TYPE_FIELD).and_then(Value::as_str)
    }

    /// Host-bound schema selected by the discriminator.
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_discriminator(self.discriminator())
    }

    /// Look up a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Borrow the underlying object.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the message and return the object as a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
