use std::io::Read;
use std::path::{Path, PathBuf};

use banglelink_frame::{LineEnding, DEFAULT_MAX_LINE_LENGTH, MAX_FRAME_SIZE};
use banglelink_session::DEFAULT_BATTERY_LOW_THRESHOLD;
use clap::{Args, Subcommand, ValueEnum};

use crate::exit::{io_error, CliResult};
use crate::output::OutputFormat;

pub mod decode;
pub mod encode;
pub mod time;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode an outbound event into the bytes sent to the watch.
    Encode(EncodeArgs),
    /// Decode watch output read from stdin or a file.
    Decode(DecodeArgs),
    /// Print the time sync line for a clock and UTC offset.
    Time(TimeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Time(args) => time::run(args, format),
        Command::Version(args) => version::run(args, format),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Event as JSON, e.g. '{"event":"find_device","start":true}'.
    #[arg(long, conflicts_with = "file")]
    pub event: Option<String>,
    /// Read the event JSON from a file. Stdin is used when neither is given.
    #[arg(long, conflicts_with = "event")]
    pub file: Option<PathBuf>,
    /// Show the individual transport writes.
    #[arg(long)]
    pub frames: bool,
    /// Bytes per transport write.
    #[arg(long, default_value_t = MAX_FRAME_SIZE)]
    pub max_frame_size: usize,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Read watch output from a file instead of stdin.
    #[arg(long)]
    pub file: Option<PathBuf>,
    /// Feed the input in fragments of this many bytes.
    #[arg(long, default_value_t = MAX_FRAME_SIZE)]
    pub chunk_size: usize,
    /// How lines are terminated.
    #[arg(long, value_enum, default_value = "lf")]
    pub line_ending: LineEndingArg,
    /// Longest line accepted; longer lines are dropped and counted as errors.
    #[arg(long, default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    pub max_line_length: usize,
    /// Battery percentage below which a warning is logged.
    #[arg(long, default_value_t = DEFAULT_BATTERY_LOW_THRESHOLD)]
    pub battery_low_threshold: u8,
}

#[derive(Args, Debug)]
pub struct TimeArgs {
    /// Seconds since the Unix epoch. Default: now.
    #[arg(long, allow_negative_numbers = true)]
    pub unix_seconds: Option<i64>,
    /// Offset from UTC in minutes (e.g. 60, -300, 330).
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub utc_offset_minutes: i32,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LineEndingArg {
    Lf,
    Crlf,
    Legacy,
}

impl From<LineEndingArg> for LineEnding {
    fn from(arg: LineEndingArg) -> Self {
        match arg {
            LineEndingArg::Lf => LineEnding::Lf,
            LineEndingArg::Crlf => LineEnding::CrLf,
            LineEndingArg::Legacy => LineEnding::LegacyTruncate,
        }
    }
}

/// Read a file, or all of stdin when no path is given.
pub(crate) fn read_input(path: Option<&Path>) -> CliResult<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err)),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(|err| io_error("failed reading stdin", err))?;
            Ok(buf)
        }
    }
}
