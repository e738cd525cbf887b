//! Gateway - TCP listener that accepts incoming IRC connections.
//!
//! The Gateway binds a socket and spawns a Connection task for each
//! incoming client. A failing connection is logged and never reaches
//! the accept loop.

use crate::handlers::Registry;
use crate::network::{Connection, ConnectionLimits};
use crate::region::Region;
use crate::state::{IdGenerator, ServerInfo};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    region: Arc<dyn Region>,
    registry: Arc<Registry>,
    info: Arc<ServerInfo>,
    ids: Arc<IdGenerator>,
    limits: ConnectionLimits,
}

impl Gateway {
    /// Bind the gateway to the specified address.
    pub async fn bind(
        addr: SocketAddr,
        region: Arc<dyn Region>,
        info: Arc<ServerInfo>,
        ids: Arc<IdGenerator>,
        limits: ConnectionLimits,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, region = region.name(), channel = %info.channel, "IRC listener bound");

        Ok(Self {
            listener,
            region,
            registry: Arc::new(Registry::new()),
            info,
            ids,
            limits,
        })
    }

    /// Address actually bound, useful when binding port 0.
    #[cfg(test)]
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Run the gateway, accepting connections forever.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        error!(%addr, error = %e, "Failed to set TCP_NODELAY");
                    }

                    let uid = self.ids.next_id();
                    info!(%uid, %addr, "Connection accepted");

                    let connection = Connection::new(
                        uid,
                        stream,
                        addr,
                        Arc::clone(&self.region),
                        Arc::clone(&self.registry),
                        Arc::clone(&self.info),
                        self.limits,
                    );

                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            error!(%uid, %addr, error = %e, "Connection error");
                        }
                        info!(%uid, %addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}
