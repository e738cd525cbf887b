//! Serialized reply writer.
//!
//! Every task that writes to one connection (command dispatch, chat relay)
//! goes through the same [`ReplySink`]. A batch is encoded and written
//! fully under the lock, so lines from different writers never interleave.

use bytes::BytesMut;
use simbridge_proto::{LineCodec, Reply};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::codec::Encoder;

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct SinkInner {
    writer: BoxedWriter,
    codec: LineCodec,
    buf: BytesMut,
}

/// Cloneable handle on a connection's write half.
#[derive(Clone)]
pub struct ReplySink {
    inner: Arc<Mutex<SinkInner>>,
}

impl ReplySink {
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(SinkInner {
                writer: Box::new(writer),
                codec: LineCodec::new(),
                buf: BytesMut::with_capacity(simbridge_proto::READ_CHUNK),
            })),
        }
    }

    /// Write one reply.
    pub async fn send(&self, reply: &Reply) -> io::Result<()> {
        self.send_all(std::slice::from_ref(reply)).await
    }

    /// Write several replies back to back, with no other writer in between.
    pub async fn send_all(&self, replies: &[Reply]) -> io::Result<()> {
        let mut guard = self.inner.lock().await;
        let SinkInner { writer, codec, buf } = &mut *guard;
        buf.clear();
        for reply in replies {
            codec
                .encode(reply.to_string(), buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        }
        writer.write_all(&buf[..]).await?;
        writer.flush().await
    }

    /// Shut down the write half.
    pub async fn shutdown(&self) -> io::Result<()> {
        self.inner.lock().await.writer.shutdown().await
    }
}
