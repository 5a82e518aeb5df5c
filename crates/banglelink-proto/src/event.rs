use serde::{Deserialize, Serialize};

use crate::time::TimeSync;
use crate::wire::{
    MSG_ALARM, MSG_CALL, MSG_FIND, MSG_MUSIC_INFO, MSG_MUSIC_STATE, MSG_NOTIFY, MSG_NOTIFY_DELETE,
    MSG_VIBRATE, MSG_WEATHER,
};

/// A host-side event destined for the watch.
///
/// Deserializes from `{"event": "<snake_case variant>", ...fields}` so that
/// events can be scripted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OutboundEvent {
    Notify(Notification),
    NotifyDelete { id: i32 },
    SetTime(TimeSync),
    SetAlarms { alarms: Vec<Alarm> },
    SetCallState(CallState),
    SetMusicState(MusicState),
    SetMusicInfo(MusicInfo),
    FindDevice { start: bool },
    SetVibration { intensity: i32 },
    SendWeather(Weather),
}

impl OutboundEvent {
    /// Discriminator of the wire message this event becomes.
    ///
    /// `None` for [`OutboundEvent::SetTime`], which is sent as a console
    /// call rather than a tagged message.
    pub fn wire_type(&self) -> Option<&'static str> {
        match self {
            Self::Notify(_) => Some(MSG_NOTIFY),
            Self::NotifyDelete { .. } => Some(MSG_NOTIFY_DELETE),
            Self::SetTime(_) => None,
            Self::SetAlarms { .. } => Some(MSG_ALARM),
            Self::SetCallState(_) => Some(MSG_CALL),
            Self::SetMusicState(_) => Some(MSG_MUSIC_STATE),
            Self::SetMusicInfo(_) => Some(MSG_MUSIC_INFO),
            Self::FindDevice { .. } => Some(MSG_FIND),
            Self::SetVibration { .. } => Some(MSG_VIBRATE),
            Self::SendWeather(_) => Some(MSG_WEATHER),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Notify(_) => "notify",
            Self::NotifyDelete { .. } => "notify_delete",
            Self::SetTime(_) => "set_time",
            Self::SetAlarms { .. } => "set_alarms",
            Self::SetCallState(_) => "set_call_state",
            Self::SetMusicState(_) => "set_music_state",
            Self::SetMusicInfo(_) => "set_music_info",
            Self::FindDevice { .. } => "find_device",
            Self::SetVibration { .. } => "set_vibration",
            Self::SendWeather(_) => "send_weather",
        }
    }
}

/// A phone notification mirrored to the watch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Notification {
    pub id: i32,
    /// Name of the app that raised it.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// One alarm slot. Disabled alarms are not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alarm {
    pub hour: u8,
    pub minute: u8,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// Phone call progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallCommand {
    #[default]
    Unknown,
    Undefined,
    Accept,
    Incoming,
    Outgoing,
    Reject,
    Start,
    End,
}

impl CallCommand {
    /// Value of the `cmd` field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::Undefined => "undefined",
            Self::Accept => "accept",
            Self::Incoming => "incoming",
            Self::Outgoing => "outgoing",
            Self::Reject => "reject",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CallState {
    pub command: CallCommand,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Play,
    Pause,
    Stop,
    #[default]
    Unknown,
}

impl PlaybackState {
    /// Value of the `state` field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Stop => "stop",
            Self::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicState {
    pub state: PlaybackState,
    /// Playback position in seconds.
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub shuffle: u8,
    #[serde(default)]
    pub repeat: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicInfo {
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    /// Track length in seconds.
    #[serde(default)]
    pub duration: i32,
    #[serde(default)]
    pub track_count: i32,
    #[serde(default)]
    pub track_number: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Weather {
    /// Current temperature in Kelvin.
    pub temperature: i32,
    /// Relative humidity in percent.
    #[serde(default)]
    pub humidity: i32,
    #[serde(default)]
    pub condition: Option<String>,
    /// Wind speed in km/h.
    #[serde(default)]
    pub wind_speed: f32,
    #[serde(default)]
    pub location: Option<String>,
}
