use std::{
    future::{Future, pending},
    io,
    net::SocketAddr,
    sync::Arc,
};

use axum::Router;
use bridge_engine::Bridge;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

use crate::{Error, Result, routes::router};

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 5050;

/// HTTP server hosting the bridge routes.
pub struct Server {
    host: String,
    port: u16,
    bridge: Arc<Bridge>,
}

impl Server {
    /// Serve `bridge` on the default address.
    pub fn new(bridge: Bridge) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bridge: Arc::new(bridge),
        }
    }

    /// Override the bind host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Override the bind port; `0` picks a free port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Bind the listener without serving yet.
    pub async fn bind(self) -> Result<BoundServer> {
        let listener = TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|source| Error::Bind {
                addr: format!("{}:{}", self.host, self.port),
                source,
            })?;
        let addr = listener.local_addr()?;
        Ok(BoundServer {
            listener,
            addr,
            router: router(self.bridge),
        })
    }

    /// Bind and serve until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let bound = self.bind().await?;
        bound.serve_with_shutdown(shutdown_on(signal::ctrl_c())).await
    }
}

/// A server whose socket is bound.
pub struct BoundServer {
    listener: TcpListener,
    addr: SocketAddr,
    router: Router,
}

impl BoundServer {
    /// Actual bound address.
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `shutdown` resolves; in-flight requests are allowed to finish.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Editor bridge listening on http://{}/open", self.addr);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

/// Resolves when `signal` fires. If the listener cannot be installed the
/// future never resolves, so the server keeps running.
async fn shutdown_on<S>(signal: S)
where
    S: Future<Output = io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            warn!("Failed to listen for Ctrl-C: {}", e);
            pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    #[tokio::test]
    async fn shutdown_fires_on_signal() {
        let fired = timeout(Duration::from_secs(1), shutdown_on(async { Ok(()) })).await;
        assert!(fired.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_signal_listener_keeps_serving() {
        let failing = async { Err(io::Error::other("no signal handler")) };
        let fired = timeout(Duration::from_secs(3600), shutdown_on(failing)).await;
        assert!(fired.is_err());
    }
}
