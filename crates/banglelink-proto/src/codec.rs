use banglelink_frame::Line;
use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use tracing::debug;

use crate::error::{ProtoError, Result};
use crate::event::{Alarm, OutboundEvent};
use crate::inbound::{InboundEvent, Severity};
use crate::wire::WireMessage;

/// Control byte that tells the watch's console a command follows.
pub const COMMAND_PREFIX: u8 = 0x10;

/// Space + Ctrl-C: abandons whatever is half-typed on the device console.
pub const CLEAR_LINE: &[u8] = b" \x03";

/// Console error printed when the watch-side bridge app is missing.
pub const PLUGIN_MISSING_LINE: &str = ">Uncaught ReferenceError: \"gb\" is not defined";

const PLUGIN_MISSING_MESSAGE: &str = "bridge plugin is not installed on the device";

const ENVELOPE_OPEN: &str = "GB(";
const ENVELOPE_CLOSE: &str = ")\n";

/// Result of decoding one inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    /// A JSON object, ready for the dispatcher.
    Message(WireMessage),
    /// A known console line with a fixed meaning.
    Diagnostic(InboundEvent),
    /// Any other console output. Logged, never dispatched.
    Text(String),
    /// Nothing on the line.
    Empty,
}

/// Encodes host events to device-bound bytes and classifies inbound lines.
///
/// Stateless: each call stands alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageCodec;

impl MessageCodec {
    pub fn new() -> Self {
        Self
    }

    /// Encode an event to the exact bytes to hand to the frame writer.
    ///
    /// Tagged messages become `\u{10}GB(<json>)\n`; time sync becomes the
    /// `setTime` console call. Output is deterministic. String fields cannot
    /// break the line: JSON escaping covers `\n` and the control byte.
    pub fn encode(&self, event: &OutboundEvent) -> Result<Bytes> {
        let body = match Rendered::from_event(event)? {
            Rendered::Tagged(body) => body,
            Rendered::Console(line) => return Ok(Bytes::from(line)),
        };
        let json = serde_json::to_vec(&body).map_err(ProtoError::Encode)?;

        let mut out =
            BytesMut::with_capacity(1 + ENVELOPE_OPEN.len() + json.len() + ENVELOPE_CLOSE.len());
        out.put_u8(COMMAND_PREFIX);
        out.put_slice(ENVELOPE_OPEN.as_bytes());
        out.put_slice(&json);
        out.put_slice(ENVELOPE_CLOSE.as_bytes());

        debug!(event = event.name(), len = out.len(), "encoded outbound message");
        Ok(out.freeze())
    }

    /// Classify one complete inbound line.
    ///
    /// Lines beginning with `{` must parse as a JSON object; anything else
    /// is console text.
    pub fn decode(&self, line: &str) -> Result<DecodedLine> {
        if line.is_empty() {
            return Ok(DecodedLine::Empty);
        }
        if line == PLUGIN_MISSING_LINE {
            return Ok(DecodedLine::Diagnostic(InboundEvent::Notice {
                severity: Severity::Error,
                message: PLUGIN_MISSING_MESSAGE.to_string(),
            }));
        }
        if line.starts_with('{') {
            return WireMessage::parse(line).map(DecodedLine::Message);
        }
        Ok(DecodedLine::Text(line.to_string()))
    }

    /// Classify a line produced by the frame layer.
    pub fn decode_line(&self, line: &Line) -> Result<DecodedLine> {
        self.decode(&line.to_text())
    }

    /// Read back a device-bound `GB(...)` line, as the watch would.
    ///
    /// Returns `None` if the line is not a tagged-message envelope.
    pub fn decode_command(&self, bytes: &[u8]) -> Result<Option<WireMessage>> {
        let Some(rest) = bytes.strip_prefix(&[COMMAND_PREFIX]) else {
            return Ok(None);
        };
        let Some(rest) = rest.strip_prefix(ENVELOPE_OPEN.as_bytes()) else {
            return Ok(None);
        };
        let Some(json) = rest.strip_suffix(ENVELOPE_CLOSE.as_bytes()) else {
            return Ok(None);
        };
        WireMessage::parse(&String::from_utf8_lossy(json)).map(Some)
    }
}

/// Device-bound message bodies, serialized with `t` first.
#[derive(Serialize)]
#[serde(tag = "t")]
enum WireBody<'a> {
    #[serde(rename = "notify")]
    Notify {
        id: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        src: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        subject: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tel: Option<&'a str>,
    },
    #[serde(rename = "notify-")]
    NotifyDelete { id: i32 },
    #[serde(rename = "alarm")]
    Alarm { d: Vec<AlarmTime> },
    #[serde(rename = "call")]
    Call {
        cmd: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        number: Option<&'a str>,
    },
    #[serde(rename = "musicstate")]
    MusicState {
        state: &'static str,
        position: i32,
        shuffle: u8,
        repeat: u8,
    },
    #[serde(rename = "musicinfo")]
    MusicInfo {
        #[serde(skip_serializing_if = "Option::is_none")]
        artist: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        album: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        track: Option<&'a str>,
        dur: i32,
        c: i32,
        n: i32,
    },
    #[serde(rename = "find")]
    Find { n: bool },
    #[serde(rename = "vibrate")]
    Vibrate { n: i32 },
    #[serde(rename = "weather")]
    Weather {
        temp: i32,
        hum: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        txt: Option<&'a str>,
        wind: f32,
        #[serde(skip_serializing_if = "Option::is_none")]
        loc: Option<&'a str>,
    },
}

/// An outbound event ready for the wire.
enum Rendered<'a> {
    Tagged(WireBody<'a>),
    Console(String),
}

#[derive(Serialize)]
struct AlarmTime {
    h: u8,
    m: u8,
}

impl<'a> Rendered<'a> {
    fn from_event(event: &'a OutboundEvent) -> Result<Self> {
        let body = match event {
            OutboundEvent::SetTime(sync) => return Ok(Rendered::Console(sync.to_line())),
            OutboundEvent::Notify(n) => WireBody::Notify {
                id: n.id,
                src: n.source.as_deref(),
                title: n.title.as_deref(),
                subject: n.subject.as_deref(),
                body: n.body.as_deref(),
                sender: n.sender.as_deref(),
                tel: n.phone_number.as_deref(),
            },
            OutboundEvent::NotifyDelete { id } => WireBody::NotifyDelete { id: *id },
            OutboundEvent::SetAlarms { alarms } => WireBody::Alarm {
                d: alarm_times(alarms)?,
            },
            OutboundEvent::SetCallState(call) => WireBody::Call {
                cmd: call.command.wire_name(),
                name: call.name.as_deref(),
                number: call.number.as_deref(),
            },
            OutboundEvent::SetMusicState(state) => WireBody::MusicState {
                state: state.state.wire_name(),
                position: state.position,
                shuffle: state.shuffle,
                repeat: state.repeat,
            },
            OutboundEvent::SetMusicInfo(info) => WireBody::MusicInfo {
                artist: info.artist.as_deref(),
                album: info.album.as_deref(),
                track: info.track.as_deref(),
                dur: info.duration,
                c: info.track_count,
                n: info.track_number,
            },
            OutboundEvent::FindDevice { start } => WireBody::Find { n: *start },
            OutboundEvent::SetVibration { intensity } => WireBody::Vibrate { n: *intensity },
            OutboundEvent::SendWeather(w) => WireBody::Weather {
                temp: w.temperature,
                hum: w.humidity,
                txt: w.condition.as_deref(),
                wind: w.wind_speed,
                loc: w.location.as_deref(),
            },
        };
        Ok(Rendered::Tagged(body))
    }
}

fn alarm_times(alarms: &[Alarm]) -> Result<Vec<AlarmTime>> {
    alarms
        .iter()
        .filter(|a| a.enabled)
        .map(|a| {
            if a.hour > 23 || a.minute > 59 {
                return Err(ProtoError::InvalidAlarm {
                    hour: a.hour,
                    minute: a.minute,
                });
            }
            Ok(AlarmTime {
                h: a.hour,
                m: a.minute,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::event::{CallCommand, CallState, Notification};
    use crate::time::TimeSync;

    #[test]
    fn find_device_envelope() {
        let bytes = MessageCodec::new()
            .encode(&OutboundEvent::FindDevice { start: true })
            .unwrap();
        assert_eq!(bytes.as_ref(), b"\x10GB({\"t\":\"find\",\"n\":true})\n");
    }

    #[test]
    fn notification_skips_absent_fields() {
        let ev = OutboundEvent::Notify(Notification {
            id: 12,
            title: Some("Lunch".to_string()),
            ..Notification::default()
        });
        let bytes = MessageCodec::new().encode(&ev).unwrap();
        assert_eq!(
            bytes.as_ref(),
            b"\x10GB({\"t\":\"notify\",\"id\":12,\"title\":\"Lunch\"})\n"
        );
    }

    #[test]
    fn field_text_cannot_break_the_line() {
        let ev = OutboundEvent::Notify(Notification {
            id: 1,
            body: Some("two\nlines \u{10} here".to_string()),
            ..Notification::default()
        });
        let bytes = MessageCodec::new().encode(&ev).unwrap();

        let newlines = bytes.iter().filter(|b| **b == b'\n').count();
        let prefixes = bytes.iter().filter(|b| **b == COMMAND_PREFIX).count();
        assert_eq!(newlines, 1);
        assert_eq!(prefixes, 1);
        assert_eq!(bytes.last(), Some(&b'\n'));
    }

    #[test]
    fn disabled_alarms_are_skipped() {
        let ev = OutboundEvent::SetAlarms {
            alarms: vec![
                Alarm {
                    hour: 6,
                    minute: 45,
                    enabled: true,
                },
                Alarm {
                    hour: 9,
                    minute: 0,
                    enabled: false,
                },
            ],
        };
        let bytes = MessageCodec::new().encode(&ev).unwrap();
        assert_eq!(
            bytes.as_ref(),
            b"\x10GB({\"t\":\"alarm\",\"d\":[{\"h\":6,\"m\":45}]})\n"
        );
    }

    #[test]
    fn out_of_range_alarm_is_an_encode_error() {
        let ev = OutboundEvent::SetAlarms {
            alarms: vec![Alarm {
                hour: 24,
                minute: 0,
                enabled: true,
            }],
        };
        let err = MessageCodec::new().encode(&ev).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::InvalidAlarm {
                hour: 24,
                minute: 0
            }
        ));
        assert!(err.is_encode());
    }

    #[test]
    fn unknown_call_command_is_empty_string() {
        let ev = OutboundEvent::SetCallState(CallState {
            command: CallCommand::Unknown,
            name: None,
            number: Some("555".to_string()),
        });
        let bytes = MessageCodec::new().encode(&ev).unwrap();
        let msg = MessageCodec::new().decode_command(&bytes).unwrap().unwrap();
        assert_eq!(msg.get("cmd"), Some(&Value::from("")));
        assert_eq!(msg.get("number"), Some(&Value::from("555")));
        assert!(msg.get("name").is_none());
    }

    #[test]
    fn set_time_uses_console_call() {
        let ev = OutboundEvent::SetTime(TimeSync {
            unix_seconds: 1_600_000_000,
            utc_offset_minutes: -60,
        });
        let bytes = MessageCodec::new().encode(&ev).unwrap();
        assert_eq!(
            bytes.as_ref(),
            b"\x10setTime(1600000000);E.setTimeZone(-1);\n"
        );
        assert!(MessageCodec::new().decode_command(&bytes).unwrap().is_none());
    }

    #[test]
    fn decode_json_line() {
        let decoded = MessageCodec::new()
            .decode(r#"{"t":"info","msg":"hi"}"#)
            .unwrap();
        match decoded {
            DecodedLine::Message(msg) => assert_eq!(msg.discriminator(), Some("info")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decode_malformed_json_is_decode_error() {
        let err = MessageCodec::new().decode(r#"{"t":"status""#).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn decode_plugin_missing_line() {
        let decoded = MessageCodec::new().decode(PLUGIN_MISSING_LINE).unwrap();
        assert!(matches!(
            decoded,
            DecodedLine::Diagnostic(InboundEvent::Notice {
                severity: Severity::Error,
                ..
            })
        ));
    }

    #[test]
    fn decode_console_text_and_empty() {
        let codec = MessageCodec::new();
        assert_eq!(
            codec.decode(">").unwrap(),
            DecodedLine::Text(">".to_string())
        );
        assert_eq!(codec.decode("").unwrap(), DecodedLine::Empty);
        assert_eq!(
            codec.decode_line(&Line::from("=undefined")).unwrap(),
            DecodedLine::Text("=undefined".to_string())
        );
    }
}
