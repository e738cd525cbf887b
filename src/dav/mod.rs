//! WebDAV verb router.
//!
//! ```text
//!   request ──▶ route (method, path prefix) ──▶ authenticate ──▶ handler
//!                  │ no path: 404               │ fail: 401         │ Err: 500
//!                  └ no verb: 405               └ WWW-Authenticate  └ logged
//! ```
//!
//! The route table is built once at startup and never changes.

pub mod auth;
pub mod backend;
mod lock;
mod propfind;
mod xml;

pub use auth::{Authenticator, BasicAuthenticator};
pub use backend::{DavBackend, MemoryBackend};
pub use lock::LockHandler;
pub use propfind::PropfindHandler;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ALLOW, HeaderName, HeaderValue, WWW_AUTHENTICATE};
use http::{HeaderMap, Method, StatusCode};
use std::sync::Arc;
use tracing::{Instrument, Level, debug, error, info, span};

use crate::config::WebDavConfig;
use crate::error::DavError;

/// An inbound request, already read off the wire.
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the router sends back.
#[derive(Debug, Clone)]
pub struct DavResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl DavResponse {
    /// Status only, empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// One verb's behavior.
#[async_trait]
pub trait DavHandler: Send + Sync {
    async fn handle(&self, user: &str, request: &DavRequest) -> Result<DavResponse, DavError>;
}

struct Route {
    method: &'static str,
    prefix: String,
    handler: Box<dyn DavHandler>,
}

/// `/dav` matches `/dav` and `/dav/x`, not `/davx`.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || prefix.ends_with('/') || rest.starts_with('/'),
        None => false,
    }
}

/// Routes requests to verb handlers after authentication.
pub struct DavRouter {
    auth: Box<dyn Authenticator>,
    routes: Vec<Route>,
}

impl DavRouter {
    pub fn new(auth: impl Authenticator + 'static) -> Self {
        Self {
            auth: Box::new(auth),
            routes: Vec::new(),
        }
    }

    /// Register `handler` for `method` on every path under `prefix`.
    pub fn route(
        mut self,
        method: &'static str,
        prefix: impl Into<String>,
        handler: impl DavHandler + 'static,
    ) -> Self {
        self.routes.push(Route {
            method,
            prefix: prefix.into(),
            handler: Box::new(handler),
        });
        self
    }

    /// LOCK and PROPFIND under `prefix`, both served by `backend`.
    pub fn with_backend(
        auth: impl Authenticator + 'static,
        prefix: &str,
        backend: Arc<dyn DavBackend>,
    ) -> Self {
        Self::new(auth)
            .route("LOCK", prefix, LockHandler::new(Arc::clone(&backend)))
            .route("PROPFIND", prefix, PropfindHandler::new(backend))
    }

    pub fn from_config(config: &WebDavConfig) -> Self {
        let auth = BasicAuthenticator::new(config.realm.clone(), &config.users);
        let backend = Arc::new(MemoryBackend::from_config(&config.resources));
        info!(
            path = %config.path,
            users = config.users.len(),
            resources = config.resources.len(),
            "WebDAV routes registered"
        );
        Self::with_backend(auth, &config.path, backend)
    }

    pub async fn dispatch(&self, request: DavRequest) -> DavResponse {
        let candidates: Vec<&Route> = self
            .routes
            .iter()
            .filter(|route| prefix_matches(&route.prefix, &request.path))
            .collect();
        if candidates.is_empty() {
            debug!(method = %request.method, path = %request.path, "No WebDAV route");
            return DavResponse::new(StatusCode::NOT_FOUND);
        }

        let Some(route) = candidates
            .iter()
            .filter(|route| route.method == request.method.as_str())
            .max_by_key(|route| route.prefix.len())
        else {
            let mut allowed: Vec<&str> = candidates.iter().map(|route| route.method).collect();
            allowed.sort_unstable();
            allowed.dedup();
            let response = DavResponse::new(StatusCode::METHOD_NOT_ALLOWED);
            return match HeaderValue::from_str(&allowed.join(", ")) {
                Ok(value) => response.header(ALLOW, value),
                Err(_) => response,
            };
        };

        let Some(user) = self.auth.authenticate(&request.headers) else {
            info!(method = %request.method, path = %request.path, "WebDAV authentication failed");
            return DavResponse::new(StatusCode::UNAUTHORIZED)
                .header(WWW_AUTHENTICATE, self.auth.challenge());
        };

        let dav_span = span!(
            Level::DEBUG,
            "dav.request",
            method = %request.method,
            path = %request.path,
            user = %user,
        );

        match route.handler.handle(&user, &request).instrument(dav_span).await {
            Ok(response) => response,
            Err(e) => {
                error!(
                    method = %request.method,
                    path = %request.path,
                    error = %e,
                    code = e.error_code(),
                    "WebDAV handler failed"
                );
                DavResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DavUserConfig;
    use crate::dav::backend::{DavResource, Depth, LockRequest, LockResponse};
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::Utc;
    use http::header::AUTHORIZATION;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl DavHandler for Counting {
        async fn handle(&self, user: &str, _: &DavRequest) -> Result<DavResponse, DavError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(DavResponse::new(StatusCode::OK).body(user.as_bytes().to_vec()))
        }
    }

    struct Failing;

    #[async_trait]
    impl DavHandler for Failing {
        async fn handle(&self, _: &str, _: &DavRequest) -> Result<DavResponse, DavError> {
            Err(DavError::BadRequest("boom".into()))
        }
    }

    /// Backend that never answers locks and lists nothing.
    struct Silent;

    impl DavBackend for Silent {
        fn lock(&self, _: &LockRequest) -> Option<LockResponse> {
            None
        }

        fn propfind(&self, _: &str, _: &str, _: Depth) -> Vec<DavResource> {
            Vec::new()
        }
    }

    fn auth() -> BasicAuthenticator {
        BasicAuthenticator::new(
            "region",
            &[DavUserConfig {
                name: "ann".into(),
                password: "pw".into(),
            }],
        )
    }

    fn request(method: &str, path: &str, authorized: bool) -> DavRequest {
        let mut headers = HeaderMap::new();
        if authorized {
            let value = format!("Basic {}", STANDARD.encode("ann:pw"));
            headers.insert(AUTHORIZATION, value.parse().unwrap());
        }
        DavRequest {
            method: Method::from_bytes(method.as_bytes()).unwrap(),
            path: path.into(),
            headers,
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_prefix_matches() {
        assert!(prefix_matches("/", "/anything"));
        assert!(prefix_matches("/dav", "/dav"));
        assert!(prefix_matches("/dav", "/dav/x"));
        assert!(prefix_matches("/dav/", "/dav/x"));
        assert!(!prefix_matches("/dav", "/davx"));
        assert!(!prefix_matches("/dav", "/"));
    }

    #[tokio::test]
    async fn test_auth_failure_skips_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = DavRouter::new(auth()).route("PROPFIND", "/dav", Counting(calls.clone()));

        let response = router.dispatch(request("PROPFIND", "/dav/x", false)).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.body.is_empty());
        assert_eq!(
            response.headers.get(WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"region\""
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let response = router.dispatch(request("PROPFIND", "/dav/x", true)).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, b"ann");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unrouted_path_and_verb() {
        let calls = Arc::new(AtomicUsize::new(0));
        let router = DavRouter::new(auth())
            .route("PROPFIND", "/dav", Counting(calls.clone()))
            .route("LOCK", "/dav", Counting(calls.clone()));

        let response = router.dispatch(request("PROPFIND", "/other", true)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);

        let response = router.dispatch(request("DELETE", "/dav/x", true)).await;
        assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers.get(ALLOW).unwrap(), "LOCK, PROPFIND");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let outer = Arc::new(AtomicUsize::new(0));
        let inner = Arc::new(AtomicUsize::new(0));
        let router = DavRouter::new(auth())
            .route("PROPFIND", "/", Counting(outer.clone()))
            .route("PROPFIND", "/dav/inner", Counting(inner.clone()));

        router.dispatch(request("PROPFIND", "/dav/inner/x", true)).await;
        router.dispatch(request("PROPFIND", "/dav/x", true)).await;
        assert_eq!(inner.load(Ordering::SeqCst), 1);
        assert_eq!(outer.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_handler_error_is_500() {
        let router = DavRouter::new(auth()).route("LOCK", "/", Failing);
        let response = router.dispatch(request("LOCK", "/x", true)).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_backend_without_answer() {
        let router = DavRouter::with_backend(auth(), "/", Arc::new(Silent));

        let lock = router.dispatch(request("LOCK", "/x", true)).await;
        assert_eq!(lock.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(lock.body.is_empty());

        let find = router.dispatch(request("PROPFIND", "/x", true)).await;
        assert_eq!(find.status, StatusCode::NOT_FOUND);
        assert_eq!(find.body, propfind::NOT_FOUND_PAGE.as_bytes());
        assert_eq!(find.headers.get("dav").unwrap(), "1");
    }

    #[tokio::test]
    async fn test_memory_backend_round() {
        let now = Utc::now();
        let backend = MemoryBackend::new(vec![DavResource {
            path: "/doc.txt".into(),
            collection: false,
            content_type: None,
            content_length: 3,
            created: now,
            modified: now,
        }]);
        let router = DavRouter::with_backend(auth(), "/", Arc::new(backend));

        let find = router.dispatch(request("PROPFIND", "/doc.txt", true)).await;
        assert_eq!(find.status, StatusCode::MULTI_STATUS);
        let body = String::from_utf8(find.body).unwrap();
        assert!(body.contains("<D:href>/doc.txt</D:href>"));
        assert!(body.contains("application/octet-stream"));

        let lock = router.dispatch(request("LOCK", "/doc.txt", true)).await;
        assert_eq!(lock.status, StatusCode::OK);
        let token = lock.headers.get("lock-token").unwrap().to_str().unwrap();
        assert!(token.starts_with("opaquelocktoken:"));

        let again = router.dispatch(request("LOCK", "/doc.txt", true)).await;
        assert_eq!(again.status, StatusCode::LOCKED);
        assert!(again.body.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_lock_timeout_is_clamped() {
        let backend = MemoryBackend::new(Vec::new());
        let router = DavRouter::with_backend(auth(), "/", Arc::new(backend));

        let mut huge = request("LOCK", "/new.txt", true);
        huge.headers.insert(
            "timeout",
            HeaderValue::from_static("Second-18446744073709551615"),
        );
        let lock = router.dispatch(huge).await;
        assert_eq!(lock.status, StatusCode::CREATED);
        let body = String::from_utf8(lock.body).unwrap();
        assert!(body.contains("<D:timeout>Second-4294967295</D:timeout>"), "{body}");

        let mut ceiling = request("LOCK", "/other.txt", true);
        ceiling
            .headers
            .insert("timeout", HeaderValue::from_static("Second-4294967295"));
        let lock = router.dispatch(ceiling).await;
        assert_eq!(lock.status, StatusCode::CREATED);
    }
}
