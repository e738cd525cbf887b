//! Connection - Handles an individual IRC client connection.
//!
//! Each Connection runs in its own Tokio task:
//!
//! ```text
//!   socket ──read──▶ FramedRead<LineCodec> ──▶ Message::parse ──▶ Registry
//!                                                                   │
//!   region chat ──▶ IrcClientView ──▶ relay task ─┐                 │
//!                                                 ▼                 ▼
//!                                         ReplySink (write lock) ──▶ socket
//! ```
//!
//! The loop ends on EOF, a read error, an oversized unterminated line,
//! QUIT, or a disconnect request from the region.

mod error_handling;
mod relay;
mod sink;
#[cfg(test)]
pub(crate) mod testing;
mod view;

pub use sink::ReplySink;
pub use view::IrcClientView;

use error_handling::{ReadErrorAction, classify_read_error};

use crate::error::HandlerError;
use crate::handlers::{Context, Registry};
use crate::region::Region;
use crate::state::{ClientId, ServerInfo, SessionState};
use futures_util::StreamExt;
use simbridge_proto::{LineCodec, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{debug, info, instrument, trace, warn};

/// Per-connection framing limits.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    pub max_line_len: usize,
    pub read_chunk: usize,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            max_line_len: simbridge_proto::line::DEFAULT_MAX_LEN,
            read_chunk: simbridge_proto::READ_CHUNK,
        }
    }
}

/// A client connection handler.
pub struct Connection<S> {
    uid: ClientId,
    addr: SocketAddr,
    stream: S,
    region: Arc<dyn Region>,
    registry: Arc<Registry>,
    info: Arc<ServerInfo>,
    limits: ConnectionLimits,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    pub fn new(
        uid: ClientId,
        stream: S,
        addr: SocketAddr,
        region: Arc<dyn Region>,
        registry: Arc<Registry>,
        info: Arc<ServerInfo>,
        limits: ConnectionLimits,
    ) -> Self {
        Self {
            uid,
            addr,
            stream,
            region,
            registry,
            info,
            limits,
        }
    }

    /// Run the connection until the peer leaves or the transport fails.
    ///
    /// Returns `Err` only for transport faults; they end this connection
    /// and nothing else.
    #[instrument(skip(self), fields(uid = %self.uid, addr = %self.addr), name = "connection")]
    pub async fn run(self) -> anyhow::Result<()> {
        let Connection {
            uid,
            addr,
            stream,
            region,
            registry,
            info,
            limits,
        } = self;

        let (read_half, write_half) = tokio::io::split(stream);
        let sink = ReplySink::new(write_half);

        let (view, chat_rx) = IrcClientView::new(uid);
        region.attach(view.clone());
        let relay = tokio::spawn(relay::relay_chat(
            chat_rx,
            sink.clone(),
            info.channel.clone(),
        ));

        let mut lines = FramedRead::with_capacity(
            read_half,
            LineCodec::with_max_len(limits.max_line_len),
            limits.read_chunk,
        );
        let mut state = SessionState::default();

        let outcome: anyhow::Result<()> = loop {
            let next = tokio::select! {
                next = lines.next() => next,
                _ = view.closed() => {
                    info!("Disconnected by region");
                    break Ok(());
                }
            };

            let line = match next {
                Some(Ok(line)) => line,
                Some(Err(e)) => match classify_read_error(&e) {
                    ReadErrorAction::LineTooLong { actual, limit } => {
                        warn!(actual, limit, "Unterminated input too long - disconnecting");
                        break Ok(());
                    }
                    ReadErrorAction::IoError => {
                        warn!(error = %e, "Read error");
                        break Err(e.into());
                    }
                },
                None => {
                    info!("Peer closed connection");
                    break Ok(());
                }
            };

            let Some(msg) = Message::parse(&line) else {
                trace!(raw = %line, "Dropped line without command");
                continue;
            };

            let mut ctx = Context {
                uid: &uid,
                remote_addr: addr,
                info: &info,
                region: region.as_ref(),
                view: &view,
                sender: &sink,
                state: &mut state,
            };

            match registry.dispatch(&mut ctx, &msg).await {
                Ok(()) => {}
                Err(HandlerError::Quit(reason)) => {
                    info!(nick = %state.nick_or_star(), reason = ?reason, "Leaving region");
                    region.on_disconnect_requested(&uid);
                    break Ok(());
                }
                Err(e) if e.is_fatal() => {
                    warn!(error = %e, code = e.error_code(), "Write failed");
                    break Err(e.into());
                }
                Err(e) => {
                    debug!(error = %e, code = e.error_code(), "Handler error");
                }
            }
        };

        relay.abort();
        region.detach(&uid);
        if let Err(e) = sink.shutdown().await {
            trace!(error = %e, "Shutdown of write half failed");
        }
        outcome
    }
}
