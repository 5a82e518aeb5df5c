//! Tagged JSON command protocol spoken with the watch.
//!
//! Device-bound messages are JSON objects wrapped in a console call:
//! `\u{10}GB(<json>)\n`. Host-bound messages are bare JSON objects, one per
//! line. Every object carries a `t` field naming its schema.
//!
//! - [`OutboundEvent`] / [`MessageCodec::encode`]: host events to wire bytes
//! - [`MessageCodec::decode`]: one complete inbound line to a [`DecodedLine`]
//! - [`EventDispatcher`]: a [`WireMessage`] to an [`InboundEvent`]

pub mod codec;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod inbound;
pub mod time;
pub mod wire;

pub use codec::{DecodedLine, MessageCodec, CLEAR_LINE, COMMAND_PREFIX, PLUGIN_MISSING_LINE};
pub use dispatch::EventDispatcher;
pub use error::{ProtoError, Result};
pub use event::{
    Alarm, CallCommand, CallState, MusicInfo, MusicState, Notification, OutboundEvent,
    PlaybackState, Weather,
};
pub use inbound::{BatteryState, CallControl, InboundEvent, MusicControl, Severity, StatusUpdate};
pub use time::TimeSync;
pub use wire::{MessageKind, WireMessage};
