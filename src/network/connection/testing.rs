//! In-memory writers for connection tests.

use parking_lot::Mutex;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::io::AsyncWrite;

/// Writer that appends everything to a shared buffer.
#[derive(Clone, Default)]
pub(crate) struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        self.contents()
            .split_terminator("\r\n")
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl AsyncWrite for SharedBuffer {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.bytes.lock().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Writer that accepts at most `max_chunk` bytes per call and yields to the
/// scheduler between calls, so an unserialized writer would interleave.
#[derive(Clone)]
pub(crate) struct ChunkedWriter {
    bytes: Arc<Mutex<Vec<u8>>>,
    calls: Arc<Mutex<usize>>,
    max_chunk: usize,
    yield_next: bool,
}

impl ChunkedWriter {
    pub(crate) fn new(max_chunk: usize) -> Self {
        Self {
            bytes: Arc::default(),
            calls: Arc::default(),
            max_chunk,
            yield_next: false,
        }
    }

    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    pub(crate) fn write_calls(&self) -> usize {
        *self.calls.lock()
    }
}

impl AsyncWrite for ChunkedWriter {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.yield_next {
            self.yield_next = false;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.yield_next = true;
        let n = buf.len().min(self.max_chunk);
        self.bytes.lock().extend_from_slice(&buf[..n]);
        *self.calls.lock() += 1;
        Poll::Ready(Ok(n))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
