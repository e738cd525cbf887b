//! Test clients.
//!
//! [`TestClient`] speaks the bridge's line protocol and returns raw reply
//! lines. [`http_exchange`] sends one raw HTTP request and returns the whole
//! response.

use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    /// Send a raw line, adding CRLF when missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single line, without its terminator.
    pub async fn recv(&mut self) -> anyhow::Result<String> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a line with a timeout.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(dur, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("connection closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Receive lines until the predicate matches, returning all of them.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<String>>
    where
        F: FnMut(&str) -> bool,
    {
        let mut lines = Vec::new();
        loop {
            let line = self.recv().await?;
            let done = predicate(&line);
            lines.push(line);
            if done {
                break;
            }
        }
        Ok(lines)
    }

    /// Drain whatever is queued.
    pub async fn drain(&mut self) {
        while self.recv_timeout(Duration::from_millis(50)).await.is_ok() {}
    }

    /// Register (NICK + USER) and wait for the end of the join announcement.
    pub async fn register(&mut self, realname: &str) -> anyhow::Result<Vec<String>> {
        self.send_raw(&format!("NICK {}", self.nick)).await?;
        self.send_raw(&format!("USER {} host server :{}", self.nick, realname))
            .await?;
        self.recv_until(|line| line.starts_with("366 ")).await
    }

    /// Send a PRIVMSG.
    #[allow(dead_code)]
    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG {} :{}", target, text)).await
    }

    /// Send QUIT.
    #[allow(dead_code)]
    pub async fn quit(&mut self, reason: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("QUIT :{}", reason)).await
    }

    /// Wait for the server to close the connection.
    #[allow(dead_code)]
    pub async fn expect_closed(&mut self) -> anyhow::Result<()> {
        let mut rest = String::new();
        let n = timeout(Duration::from_secs(5), self.reader.read_line(&mut rest)).await??;
        anyhow::ensure!(n == 0, "expected EOF, got {rest:?}");
        Ok(())
    }
}

/// Send one raw HTTP/1.1 request and read the response until the server
/// closes the connection.
#[allow(dead_code)]
pub async fn http_exchange(address: &str, raw: &str) -> anyhow::Result<String> {
    let mut stream = TcpStream::connect(address).await?;
    stream.write_all(raw.as_bytes()).await?;
    let mut out = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut out)).await??;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
