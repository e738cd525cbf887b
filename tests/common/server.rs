//! Test server management.
//!
//! Spawns and manages simbridge processes for integration testing. Each
//! test picks its own fixed ports so tests can run in parallel.

use std::process::{Child, Command};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A running gateway process.
pub struct TestServer {
    child: Child,
    irc_port: u16,
    dav_port: Option<u16>,
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a gateway for region "My Region" with no WebDAV and no bots.
    #[allow(dead_code)]
    pub async fn spawn(irc_port: u16) -> anyhow::Result<Self> {
        Self::spawn_with(irc_port, None, "").await
    }

    /// Spawn a gateway, optionally with a WebDAV listener on `dav_port`.
    /// `extra` is appended to the generated config verbatim.
    pub async fn spawn_with(
        irc_port: u16,
        dav_port: Option<u16>,
        extra: &str,
    ) -> anyhow::Result<Self> {
        let data_dir = tempfile::tempdir()?;
        let config_path = data_dir.path().join("config.toml");

        let mut config = format!(
            r#"
[server]
name = "test.server"

[region]
name = "My Region"
topic = "Test Topic"
motd = ["- Test Server"]
presences = ["Static Guy"]

[listen]
address = "127.0.0.1:{irc_port}"
"#
        );
        if let Some(port) = dav_port {
            config.push_str(&format!(
                r#"
[webdav]
address = "127.0.0.1:{port}"
realm = "test"

[[webdav.users]]
name = "ann"
password = "pw"

[[webdav.resources]]
path = "/"
collection = true

[[webdav.resources]]
path = "/notes.txt"
content_type = "text/plain"
length = 12
"#
            ));
        }
        config.push_str(extra);
        std::fs::write(&config_path, config)?;

        let child = Command::new(env!("CARGO_BIN_EXE_simbridge"))
            .arg(&config_path)
            .spawn()?;

        let server = Self {
            child,
            irc_port,
            dav_port,
            _data_dir: data_dir,
        };

        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until every configured listener accepts connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        let ports: Vec<u16> = std::iter::once(self.irc_port).chain(self.dav_port).collect();
        for _ in 0..50 {
            let mut ready = true;
            for port in &ports {
                if tokio::net::TcpStream::connect(("127.0.0.1", *port))
                    .await
                    .is_err()
                {
                    ready = false;
                }
            }
            if ready {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// IRC listener address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.irc_port)
    }

    /// WebDAV listener address.
    #[allow(dead_code)]
    pub fn dav_address(&self) -> String {
        format!("127.0.0.1:{}", self.dav_port.unwrap_or_default())
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
