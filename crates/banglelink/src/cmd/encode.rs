use banglelink_proto::{InboundEvent, OutboundEvent};
use banglelink_session::{Session, SessionConfig};
use banglelink_transport::RecordingTransport;

use crate::cmd::{read_input, EncodeArgs};
use crate::exit::{session_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_encoded, OutputFormat};

pub fn run(args: EncodeArgs, format: OutputFormat) -> CliResult<i32> {
    let event = parse_event(&args)?;
    let writes = encode(&event, args.max_frame_size)?;

    let wire: Vec<u8> = writes.concat();
    let frames = args.frames.then_some(writes.as_slice());
    print_encoded(event.name(), &wire, frames, format);
    Ok(SUCCESS)
}

fn parse_event(args: &EncodeArgs) -> CliResult<OutboundEvent> {
    let text = match &args.event {
        Some(json) => json.clone().into_bytes(),
        None => read_input(args.file.as_deref())?,
    };
    serde_json::from_slice(&text)
        .map_err(|err| CliError::new(DATA_INVALID, format!("invalid event JSON: {err}")))
}

/// Run the event through a session and return each transport write.
fn encode(event: &OutboundEvent, max_frame_size: usize) -> CliResult<Vec<Vec<u8>>> {
    let config = SessionConfig::default().with_max_frame_size(max_frame_size);
    let mut session = Session::with_config(
        RecordingTransport::new(),
        Vec::<InboundEvent>::new(),
        config,
    )
    .map_err(|err| session_error("encode failed", err))?;

    session
        .send(event)
        .map_err(|err| session_error("encode failed", err))?;

    let (transport, _) = session.into_parts();
    Ok(transport.writes().iter().map(|w| w.to_vec()).collect())
}
