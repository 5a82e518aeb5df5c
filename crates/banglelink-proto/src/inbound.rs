use std::fmt;

use serde::Serialize;

/// A semantic event decoded from the watch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum InboundEvent {
    /// Free-text notice to surface to the user.
    Notice { severity: Severity, message: String },
    StatusUpdate(StatusUpdate),
    FindPhoneRequest { start: bool },
    MusicControlRequest { command: MusicControl },
    CallControlRequest { command: CallControl },
    /// A well-formed message this host does not understand. Not an error.
    Unrecognized { discriminator: Option<String> },
}

impl InboundEvent {
    /// Short name for logs and tables.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Notice { .. } => "notice",
            Self::StatusUpdate(_) => "status_update",
            Self::FindPhoneRequest { .. } => "find_phone_request",
            Self::MusicControlRequest { .. } => "music_control_request",
            Self::CallControlRequest { .. } => "call_control_request",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

impl fmt::Display for InboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Notice { severity, message } => write!(f, "{severity}: {message}"),
            Self::StatusUpdate(status) => {
                write!(f, "status")?;
                if let Some(bat) = status.battery_percent {
                    write!(f, " battery={bat}%")?;
                }
                if let Some(volt) = status.voltage {
                    write!(f, " voltage={volt}V")?;
                }
                Ok(())
            }
            Self::FindPhoneRequest { start } => {
                write!(f, "find phone {}", if *start { "start" } else { "stop" })
            }
            Self::MusicControlRequest { command } => write!(f, "music {}", command.as_str()),
            Self::CallControlRequest { command } => write!(f, "call {}", command.as_str()),
            Self::Unrecognized { discriminator } => match discriminator {
                Some(t) => write!(f, "unrecognized '{t}'"),
                None => write!(f, "unrecognized"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatteryState {
    Normal,
    Low,
}

/// Battery report from the watch.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StatusUpdate {
    /// Charge in percent, clamped to 0..=100.
    pub battery_percent: Option<u8>,
    /// Battery voltage in volts.
    pub voltage: Option<f32>,
}

impl StatusUpdate {
    /// Classify the charge against a low-battery threshold (percent).
    pub fn battery_state(&self, low_threshold: u8) -> Option<BatteryState> {
        self.battery_percent.map(|pct| {
            if pct < low_threshold {
                BatteryState::Low
            } else {
                BatteryState::Normal
            }
        })
    }
}

macro_rules! control_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every known command.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Match a wire name, ignoring ASCII case.
            pub fn from_wire(value: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|cmd| cmd.as_str().eq_ignore_ascii_case(value))
            }

            /// Canonical lowercase wire name.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }
    };
}

control_enum! {
    /// Media control requested from the watch.
    MusicControl {
        Play => "play",
        Pause => "pause",
        PlayPause => "playpause",
        Next => "next",
        Previous => "previous",
        VolumeUp => "volumeup",
        VolumeDown => "volumedown",
        Forward => "forward",
        Rewind => "rewind",
        Unknown => "unknown",
    }
}

control_enum! {
    /// Call control requested from the watch.
    CallControl {
        Accept => "accept",
        End => "end",
        Incoming => "incoming",
        Outgoing => "outgoing",
        Reject => "reject",
        Start => "start",
        Ignore => "ignore",
        Unknown => "unknown",
    }
}
