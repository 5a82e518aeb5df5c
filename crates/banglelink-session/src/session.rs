use banglelink_frame::{FrameWriter, LineAssembler};
use banglelink_proto::{
    BatteryState, DecodedLine, EventDispatcher, InboundEvent, MessageCodec, OutboundEvent,
    ProtoError, TimeSync, CLEAR_LINE,
};
use banglelink_transport::Transport;
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::Result;
use crate::sink::EventSink;

/// Outcome of feeding one inbound fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReceiveReport {
    /// Complete lines the fragment finished.
    pub lines: usize,
    /// Events handed to the sink.
    pub events: usize,
    /// Lines dropped as undecodable or over-long.
    pub errors: usize,
    /// Console text and blank lines.
    pub ignored: usize,
}

impl ReceiveReport {
    fn absorb(&mut self, other: ReceiveReport) {
        self.lines += other.lines;
        self.events += other.events;
        self.errors += other.errors;
        self.ignored += other.ignored;
    }
}

/// Running totals over the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    pub messages_sent: u64,
    pub frames_sent: u64,
    pub lines_received: u64,
    pub events_dispatched: u64,
    pub decode_errors: u64,
    pub lines_dropped: u64,
}

/// One connection to one watch.
///
/// Owns the outbound frame writer and the inbound line buffer, so every
/// write and every fragment goes through `&mut self`: writes never
/// interleave and the receive buffer has a single writer. For use from
/// several tasks, put it behind a `SessionActor` (`async` feature).
pub struct Session<T, S> {
    writer: FrameWriter<T>,
    assembler: LineAssembler,
    codec: MessageCodec,
    dispatcher: EventDispatcher,
    sink: S,
    config: SessionConfig,
    stats: SessionStats,
}

impl<T: Transport, S: EventSink> Session<T, S> {
    /// Create a session with default configuration.
    pub fn new(transport: T, sink: S) -> Self {
        Self::build(transport, sink, SessionConfig::default())
    }

    /// Create a session with explicit configuration.
    pub fn with_config(transport: T, sink: S, config: SessionConfig) -> Result<Self> {
        config.frame.validate()?;
        Ok(Self::build(transport, sink, config))
    }

    fn build(transport: T, sink: S, config: SessionConfig) -> Self {
        Self {
            writer: FrameWriter::with_config(transport, config.frame.clone()),
            assembler: LineAssembler::with_line_ending(config.line_ending)
                .with_max_line_length(config.frame.max_line_length),
            codec: MessageCodec::new(),
            dispatcher: EventDispatcher::new(),
            sink,
            config,
            stats: SessionStats::default(),
        }
    }

    /// Bring the device console to a known state and set its clock.
    ///
    /// Writes the clear-line sequence (unless disabled) followed by the
    /// time sync line. Returns the number of frames written.
    pub fn initialize(&mut self, time: TimeSync) -> Result<usize> {
        let mut frames = 0;
        if self.config.clear_line_on_init {
            frames += self.write_bytes(Bytes::from_static(CLEAR_LINE))?;
        }
        frames += self.send(&OutboundEvent::SetTime(time))?;
        info!(
            unix_seconds = time.unix_seconds,
            utc_offset_minutes = time.utc_offset_minutes,
            "session initialized"
        );
        Ok(frames)
    }

    /// Encode and write one event. Returns the number of frames written.
    ///
    /// An encode error writes nothing. A transport error may leave a
    /// partial message on the wire; nothing is retried.
    pub fn send(&mut self, event: &OutboundEvent) -> Result<usize> {
        let bytes = self.codec.encode(event)?;
        let frames = self.write_bytes(bytes)?;
        self.stats.messages_sent += 1;
        debug!(event = event.name(), frames, "sent");
        Ok(frames)
    }

    fn write_bytes(&mut self, bytes: Bytes) -> Result<usize> {
        let frames = self.writer.write_bytes(bytes)?;
        self.stats.frames_sent += frames as u64;
        Ok(frames)
    }

    /// Feed one inbound fragment.
    ///
    /// Every line the fragment completes is decoded and dispatched in order.
    /// Undecodable lines are logged, passed to [`EventSink::on_error`] and
    /// skipped; they never stop the lines after them. Lines longer than
    /// the configured maximum are dropped by the assembler and only counted.
    pub fn receive(&mut self, fragment: &[u8]) -> ReceiveReport {
        let mut report = ReceiveReport::default();

        for line in self.assembler.feed(fragment) {
            let line = match line {
                Ok(line) => line,
                Err(_) => {
                    self.stats.lines_dropped += 1;
                    report.errors += 1;
                    continue;
                }
            };
            report.lines += 1;
            let text = line.to_text();
            self.stats.lines_received += 1;
            match self.process_line(&text) {
                Ok(Some(event)) => {
                    self.note_battery(&event);
                    self.sink.on_event(event);
                    self.stats.events_dispatched += 1;
                    report.events += 1;
                }
                Ok(None) => report.ignored += 1,
                Err(err) => {
                    warn!(error = %err, line = %text, "dropping inbound line");
                    self.sink.on_error(&err);
                    self.stats.decode_errors += 1;
                    report.errors += 1;
                }
            }
        }
        report
    }

    /// Feed several fragments in order.
    pub fn receive_all<'a, I>(&mut self, fragments: I) -> ReceiveReport
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut total = ReceiveReport::default();
        for fragment in fragments {
            total.absorb(self.receive(fragment));
        }
        total
    }

    fn process_line(&self, text: &str) -> std::result::Result<Option<InboundEvent>, ProtoError> {
        match self.codec.decode(text)? {
            DecodedLine::Message(msg) => self.dispatcher.dispatch(&msg).map(Some),
            DecodedLine::Diagnostic(event) => Ok(Some(event)),
            DecodedLine::Text(text) => {
                debug!(line = %text, "console output");
                Ok(None)
            }
            DecodedLine::Empty => Ok(None),
        }
    }

    fn note_battery(&self, event: &InboundEvent) {
        if let InboundEvent::StatusUpdate(status) = event {
            if status.battery_state(self.config.battery_low_threshold) == Some(BatteryState::Low) {
                warn!(
                    battery_percent = status.battery_percent,
                    threshold = self.config.battery_low_threshold,
                    "watch battery low"
                );
            }
        }
    }

    /// Drop any buffered partial line, e.g. after a reconnect.
    pub fn reset_receive_buffer(&mut self) -> usize {
        let dropped = self.assembler.clear();
        if dropped > 0 {
            debug!(dropped, "discarded partial inbound line");
        }
        dropped
    }

    /// Bytes of the current partial line.
    pub fn pending_bytes(&self) -> usize {
        self.assembler.pending().len()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.writer.get_ref()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.writer.get_mut()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the session and return its transport and sink.
    pub fn into_parts(self) -> (T, S) {
        (self.writer.into_inner(), self.sink)
    }
}
