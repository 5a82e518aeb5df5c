//! Drive a session against canned watch output.
//!
//! Run with:
//!   cargo run --example simulated-watch
//!
//! Device-bound writes go to stdout as hex, one frame per line; decoded
//! watch events go to stderr.

use std::io;

use banglelink::proto::{InboundEvent, Notification, OutboundEvent, TimeSync};
use banglelink::session::{EventSink, Session};
use banglelink::transport::IoTransport;

struct PrintSink;

impl EventSink for PrintSink {
    fn on_event(&mut self, event: InboundEvent) {
        eprintln!("watch -> {event}");
    }

    fn on_error(&mut self, error: &banglelink::proto::ProtoError) {
        eprintln!("watch -> (dropped: {error})");
    }
}

/// Writes each frame as a hex line.
struct HexWriter<W>(W);

impl<W: io::Write> io::Write for HexWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let hex: Vec<String> = buf.iter().map(|b| format!("{b:02x}")).collect();
        writeln!(self.0, "{}", hex.join(" "))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

const WATCH_OUTPUT: &[&[u8]] = &[
    b"\r\n>",
    b"{\"t\":\"status\",\"bat\"",
    b":23,\"volt\":3.61}\n{\"t",
    b"\":\"findPhone\",\"n\":tr",
    b"ue}\n{\"t\":\"music\",\"n\":\"",
    b"NEXT\"}\n{\"t\":\"music\",\"n",
    b"\":\"eject\"}\n",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let transport = IoTransport::new(HexWriter(io::stdout()));
    let mut session = Session::new(transport, PrintSink);

    session.initialize(TimeSync {
        unix_seconds: 1_700_000_000,
        utc_offset_minutes: 60,
    })?;
    session.send(&OutboundEvent::Notify(Notification {
        id: 1,
        source: Some("Mail".to_string()),
        title: Some("Build finished".to_string()),
        body: Some("all green".to_string()),
        ..Notification::default()
    }))?;

    for fragment in WATCH_OUTPUT {
        session.receive(fragment);
    }

    let stats = session.stats();
    eprintln!(
        "sent {} messages in {} frames; received {} lines, {} events, {} errors",
        stats.messages_sent,
        stats.frames_sent,
        stats.lines_received,
        stats.events_dispatched,
        stats.decode_errors
    );
    Ok(())
}
