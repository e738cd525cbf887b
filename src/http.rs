//! HTTP listener for the WebDAV router.
//!
//! Runs on a separate tokio task. Every request goes to one fallback
//! handler, which accepts extension verbs such as LOCK and PROPFIND.

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::response::Response;
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::dav::{DavRequest, DavRouter};

/// Handler for every request - hands it to the WebDAV router.
async fn dav_handler(
    State(router): State<Arc<DavRouter>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = DavRequest {
        method,
        path: uri.path().to_string(),
        headers,
        body,
    };
    let dav = router.dispatch(request).await;

    let mut response = Response::new(Body::from(dav.body));
    *response.status_mut() = dav.status;
    *response.headers_mut() = dav.headers;
    response
}

/// Serve `router` on an already bound listener.
pub async fn serve_dav(listener: TcpListener, router: Arc<DavRouter>) -> std::io::Result<()> {
    let app = Router::new().fallback(dav_handler).with_state(router);
    axum::serve(listener, app).await
}

/// Run the HTTP server for WebDAV.
///
/// This is a long-running task that should be spawned in the background.
pub async fn run_dav_server(addr: SocketAddr, router: Arc<DavRouter>) {
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind WebDAV server");
            return;
        }
    };
    tracing::info!(%addr, "WebDAV server listening");

    if let Err(e) = serve_dav(listener, router).await {
        tracing::error!(error = %e, "WebDAV server error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DavUserConfig;
    use crate::dav::BasicAuthenticator;
    use crate::dav::backend::{DavResource, MemoryBackend};
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn start() -> SocketAddr {
        let now = Utc::now();
        let backend = MemoryBackend::new(vec![DavResource {
            path: "/".into(),
            collection: true,
            content_type: None,
            content_length: 0,
            created: now,
            modified: now,
        }]);
        let auth = BasicAuthenticator::new(
            "region",
            &[DavUserConfig {
                name: "ann".into(),
                password: "pw".into(),
            }],
        );
        let router = Arc::new(DavRouter::with_backend(auth, "/", Arc::new(backend)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve_dav(listener, router));
        addr
    }

    async fn exchange(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw.as_bytes()).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    #[tokio::test]
    async fn test_extension_verb_reaches_router() {
        let addr = start().await;
        // YW5uOnB3 = ann:pw
        let response = exchange(
            addr,
            "PROPFIND / HTTP/1.1\r\nHost: x\r\nDepth: 0\r\nAuthorization: Basic YW5uOnB3\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 207"), "{response}");
        assert!(response.contains("<D:multistatus"));
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let addr = start().await;
        let response = exchange(
            addr,
            "LOCK / HTTP/1.1\r\nHost: x\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 401"), "{response}");
        assert!(response.to_ascii_lowercase().contains("www-authenticate: basic realm=\"region\""));
    }
}
