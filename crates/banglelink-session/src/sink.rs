use std::sync::mpsc;

use banglelink_proto::{InboundEvent, ProtoError};
use tracing::debug;

/// Receives what a session decodes from the watch.
///
/// Called synchronously from [`Session::receive`](crate::Session::receive),
/// in line order.
pub trait EventSink {
    /// A decoded event.
    fn on_event(&mut self, event: InboundEvent);

    /// A line that was dropped because it could not be decoded.
    ///
    /// The session has already logged it; the default does nothing else.
    fn on_error(&mut self, error: &ProtoError) {
        let _ = error;
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn on_event(&mut self, event: InboundEvent) {
        (**self).on_event(event);
    }

    fn on_error(&mut self, error: &ProtoError) {
        (**self).on_error(error);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_event(&mut self, event: InboundEvent) {
        (**self).on_event(event);
    }

    fn on_error(&mut self, error: &ProtoError) {
        (**self).on_error(error);
    }
}

impl EventSink for Vec<InboundEvent> {
    fn on_event(&mut self, event: InboundEvent) {
        self.push(event);
    }
}

impl EventSink for mpsc::Sender<InboundEvent> {
    fn on_event(&mut self, event: InboundEvent) {
        if self.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

#[cfg(feature = "async")]
impl EventSink for tokio::sync::mpsc::UnboundedSender<InboundEvent> {
    fn on_event(&mut self, event: InboundEvent) {
        if self.send(event).is_err() {
            debug!("event receiver dropped");
        }
    }
}

/// Keeps events and decode errors, in arrival order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub events: Vec<InboundEvent>,
    pub errors: Vec<String>,
}

impl EventSink for CollectingSink {
    fn on_event(&mut self, event: InboundEvent) {
        self.events.push(event);
    }

    fn on_error(&mut self, error: &ProtoError) {
        self.errors.push(error.to_string());
    }
}
