//! A live link to one watch.
//!
//! [`Session`] is where the pieces meet: outbound events are encoded by the
//! protocol codec and cut into frames for the transport; inbound fragments
//! are reassembled into lines, decoded, dispatched and handed to an
//! [`EventSink`]. With the `async` feature, [`SessionActor`] runs a session
//! inside a task fed by a command queue.

#[cfg(feature = "async")]
pub mod actor;
pub mod config;
pub mod error;
pub mod session;
pub mod sink;

#[cfg(feature = "async")]
pub use actor::{SessionActor, SessionHandle};
pub use config::{SessionConfig, DEFAULT_BATTERY_LOW_THRESHOLD};
pub use error::{Result, SessionError};
pub use session::{ReceiveReport, Session, SessionStats};
pub use sink::{CollectingSink, EventSink};
