//! Write-side transport abstraction for the device link.
//!
//! The device exposes a UART-style service with one write characteristic
//! and one notify characteristic. Establishing the connection and
//! subscribing to notifications happen elsewhere; this crate only models
//! the part the framing layer needs: an ordered sink that accepts one
//! bounded-size write at a time.
//!
//! - [`Transport`]: the sink trait
//! - [`IoTransport`]: adapter over any [`std::io::Write`]
//! - [`RecordingTransport`]: in-memory sink that keeps every write

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::RecordingTransport;
pub use traits::{IoTransport, Transport};
