use banglelink_session::{CollectingSink, ReceiveReport, Session, SessionConfig};
use banglelink_transport::RecordingTransport;
use tracing::{info, warn};

use crate::cmd::{read_input, DecodeArgs};
use crate::exit::{session_error, CliError, CliResult, DATA_INVALID, SUCCESS, USAGE};
use crate::output::{print_events, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    if args.chunk_size == 0 {
        return Err(CliError::new(USAGE, "--chunk-size must be greater than zero"));
    }
    let input = read_input(args.file.as_deref())?;
    let (report, sink) = decode(&input, &args)?;

    print_events(&sink.events, format);
    info!(
        lines = report.lines,
        events = report.events,
        errors = report.errors,
        ignored = report.ignored,
        "decode complete"
    );

    if report.errors > 0 {
        return Ok(DATA_INVALID);
    }
    Ok(SUCCESS)
}

/// Feed `input` through a session in `chunk_size` fragments, as the BLE
/// notify path would.
fn decode(input: &[u8], args: &DecodeArgs) -> CliResult<(ReceiveReport, CollectingSink)> {
    let config = SessionConfig::default()
        .with_line_ending(args.line_ending.into())
        .with_max_line_length(args.max_line_length)
        .with_battery_low_threshold(args.battery_low_threshold);
    let mut session =
        Session::with_config(RecordingTransport::new(), CollectingSink::default(), config)
            .map_err(|err| session_error("decode failed", err))?;

    let report = session.receive_all(input.chunks(args.chunk_size));
    let pending = session.pending_bytes();
    if pending > 0 {
        warn!(pending, "input ended mid-line; partial line discarded");
    }

    let (_, sink) = session.into_parts();
    Ok((report, sink))
}
