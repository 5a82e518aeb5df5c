//! Host-side bridge to a Bangle.js watch.
//!
//! The watch speaks newline-delimited JSON over a UART-style BLE service
//! whose writes and notifications are capped at 20 bytes. banglelink turns
//! host events into framed device commands and watch output into typed
//! events; connecting to the device is left to the caller's BLE stack.
//!
//! # Crate Structure
//!
//! - [`transport`]: Write-side transport trait and adapters
//! - [`frame`]: 20-byte outbound framing and inbound line reassembly
//! - [`proto`]: Message envelope, encoding and event dispatch
//! - [`session`]: A single-owner session tying the layers together

/// Re-export transport types.
pub mod transport {
    pub use banglelink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use banglelink_frame::*;
}

/// Re-export protocol types.
pub mod proto {
    pub use banglelink_proto::*;
}

/// Re-export session types.
pub mod session {
    pub use banglelink_session::*;
}
