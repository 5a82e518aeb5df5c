//! Channel-fed task that owns a [`Session`].
//!
//! The BLE stack usually delivers notifications on one task while the
//! application sends from others. Routing both through one mpsc queue keeps
//! the receive buffer single-writer and keeps outbound writes in submission
//! order without a lock.

use banglelink_proto::{OutboundEvent, TimeSync};
use banglelink_transport::Transport;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::{Result, SessionError};
use crate::session::{ReceiveReport, Session, SessionStats};
use crate::sink::EventSink;

/// Default depth of the command queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

enum Command {
    Initialize {
        time: TimeSync,
        reply: oneshot::Sender<Result<usize>>,
    },
    Send {
        event: OutboundEvent,
        reply: oneshot::Sender<Result<usize>>,
    },
    Receive {
        fragment: Vec<u8>,
        reply: Option<oneshot::Sender<ReceiveReport>>,
    },
    Stats {
        reply: oneshot::Sender<SessionStats>,
    },
    Shutdown,
}

/// Cloneable handle to a running [`SessionActor`].
#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub async fn initialize(&self, time: TimeSync) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Initialize { time, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Queue an event and wait until its frames are written.
    pub async fn send(&self, event: OutboundEvent) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Send { event, reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)?
    }

    /// Queue an inbound fragment and wait for it to be processed.
    pub async fn receive(&self, fragment: impl Into<Vec<u8>>) -> Result<ReceiveReport> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Receive {
            fragment: fragment.into(),
            reply: Some(reply),
        })
        .await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Queue an inbound fragment without waiting.
    ///
    /// Suitable for a notification callback; fragments are still processed
    /// in the order they were queued. If the queue is full the fragment comes
    /// back in [`SessionError::Busy`] and nothing was queued.
    pub fn try_deliver(&self, fragment: impl Into<Vec<u8>>) -> Result<()> {
        self.sender
            .try_send(Command::Receive {
                fragment: fragment.into(),
                reply: None,
            })
            .map_err(|err| match err {
                TrySendError::Full(Command::Receive { fragment, .. }) => {
                    SessionError::Busy(fragment)
                }
                TrySendError::Full(_) | TrySendError::Closed(_) => SessionError::Closed,
            })
    }

    pub async fn stats(&self) -> Result<SessionStats> {
        let (reply, rx) = oneshot::channel();
        self.request(Command::Stats { reply }).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Ask the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<()> {
        self.request(Command::Shutdown).await
    }

    async fn request(&self, cmd: Command) -> Result<()> {
        self.sender.send(cmd).await.map_err(|_| SessionError::Closed)
    }
}

/// Owns a session and applies queued commands one at a time.
pub struct SessionActor<T, S> {
    session: Session<T, S>,
    receiver: mpsc::Receiver<Command>,
}

impl<T, S> SessionActor<T, S>
where
    T: Transport + Send + 'static,
    S: EventSink + Send + 'static,
{
    /// Wrap `session`; `queue_depth` bounds the command queue.
    pub fn new(session: Session<T, S>, queue_depth: usize) -> (Self, SessionHandle) {
        let (sender, receiver) = mpsc::channel(queue_depth.max(1));
        (Self { session, receiver }, SessionHandle { sender })
    }

    /// Spawn the actor on the current runtime.
    ///
    /// The join handle yields the session back once the actor stops.
    pub fn spawn(session: Session<T, S>) -> (SessionHandle, JoinHandle<Session<T, S>>) {
        let (actor, handle) = Self::new(session, DEFAULT_QUEUE_DEPTH);
        (handle, tokio::spawn(actor.run()))
    }

    /// Process commands until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> Session<T, S> {
        info!("session actor started");
        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                Command::Initialize { time, reply } => {
                    let _ = reply.send(self.session.initialize(time));
                }
                Command::Send { event, reply } => {
                    let _ = reply.send(self.session.send(&event));
                }
                Command::Receive { fragment, reply } => {
                    let report = self.session.receive(&fragment);
                    if let Some(reply) = reply {
                        let _ = reply.send(report);
                    }
                }
                Command::Stats { reply } => {
                    let _ = reply.send(self.session.stats());
                }
                Command::Shutdown => {
                    debug!("shutdown requested");
                    break;
                }
            }
        }
        info!("session actor stopped");
        self.session
    }
}
