//! Share one session between a notification task and a sender task.
//!
//! Run with:
//!   cargo run --example async-bridge --features async

use banglelink::proto::{InboundEvent, MusicControl, MusicState, OutboundEvent, PlaybackState};
use banglelink::session::{Session, SessionActor};
use banglelink::transport::RecordingTransport;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<InboundEvent>();
    let session = Session::new(RecordingTransport::new(), events_tx);
    let (handle, task) = SessionActor::spawn(session);

    // Stands in for the BLE notify callback.
    let notify = handle.clone();
    let notifier = tokio::spawn(async move {
        for fragment in [
            &b"{\"t\":\"music\",\"n\":\"pl"[..],
            &b"ay\"}\n{\"t\":\"music\",\"n\":\"next\"}\n"[..],
        ] {
            notify.receive(fragment).await?;
        }
        Ok::<_, banglelink::session::SessionError>(())
    });

    let mut state = MusicState::default();
    while let Some(event) = events_rx.recv().await {
        println!("watch -> {event}");
        if let InboundEvent::MusicControlRequest { command } = event {
            state.state = match command {
                MusicControl::Play => PlaybackState::Play,
                MusicControl::Pause => PlaybackState::Pause,
                _ => state.state,
            };
            let frames = handle.send(OutboundEvent::SetMusicState(state)).await?;
            println!("host  -> musicstate {:?} ({frames} frames)", state.state);
            if command == MusicControl::Next {
                break;
            }
        }
    }

    notifier.await??;
    handle.shutdown().await?;
    let session = task.await?;
    println!("wrote {} bytes", session.transport().concat().len());
    Ok(())
}
