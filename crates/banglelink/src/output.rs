use std::io::{IsTerminal, Write};

use banglelink_proto::{InboundEvent, TimeSync};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct EncodedOutput<'a> {
    event: &'a str,
    wire: String,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames: Option<Vec<String>>,
}

/// Print an encoded device-bound line and, optionally, its frames.
pub fn print_encoded(
    event: &str,
    wire: &[u8],
    frames: Option<&[Vec<u8>]>,
    format: OutputFormat,
) {
    match format {
        OutputFormat::Json => {
            let out = EncodedOutput {
                event,
                wire: escape_wire(wire),
                size: wire.len(),
                frames: frames.map(|f| f.iter().map(|b| escape_wire(b)).collect()),
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);
            match frames {
                Some(frames) => {
                    table.set_header(vec!["FRAME", "SIZE", "BYTES"]);
                    for (i, frame) in frames.iter().enumerate() {
                        table.add_row(vec![
                            i.to_string(),
                            frame.len().to_string(),
                            escape_wire(frame),
                        ]);
                    }
                }
                None => {
                    table.set_header(vec!["EVENT", "SIZE", "WIRE"]);
                    table.add_row(vec![
                        event.to_string(),
                        wire.len().to_string(),
                        escape_wire(wire),
                    ]);
                }
            }
            println!("{table}");
        }
        OutputFormat::Pretty => match frames {
            Some(frames) => {
                for (i, frame) in frames.iter().enumerate() {
                    println!("frame {i} ({} bytes): {}", frame.len(), escape_wire(frame));
                }
            }
            None => println!("{event} ({} bytes): {}", wire.len(), escape_wire(wire)),
        },
        OutputFormat::Raw => print_raw(wire),
    }
}

/// Print decoded inbound events.
pub fn print_events(events: &[InboundEvent], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for event in events {
                println!("{}", to_json(event));
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "EVENT", "DETAIL"]);
            for (i, event) in events.iter().enumerate() {
                table.add_row(vec![i.to_string(), event.name().to_string(), event.to_string()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for event in events {
                println!("{event}");
            }
        }
    }
}

#[derive(Serialize)]
struct TimeOutput<'a> {
    unix_seconds: i64,
    utc_offset_minutes: i32,
    offset_hours: String,
    line: &'a str,
}

/// Print a time sync line.
pub fn print_time(sync: &TimeSync, format: OutputFormat) {
    let line = sync.to_line();
    let escaped = escape_wire(line.as_bytes());
    match format {
        OutputFormat::Json => {
            let out = TimeOutput {
                unix_seconds: sync.unix_seconds,
                utc_offset_minutes: sync.utc_offset_minutes,
                offset_hours: sync.offset_hours(),
                line: &escaped,
            };
            println!("{}", to_json(&out));
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["UNIX", "OFFSET (H)", "LINE"])
                .add_row(vec![
                    sync.unix_seconds.to_string(),
                    sync.offset_hours(),
                    escaped,
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{escaped}"),
        OutputFormat::Raw => print_raw(line.as_bytes()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Render wire bytes as printable text. Control bytes become `\xNN`.
pub fn escape_wire(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}
