//! LOCK verb.
//!
//! Parses `lockinfo`, asks the backend for a lock and answers with the
//! `lockdiscovery` document. The document is ASCII with non-ASCII text as
//! character references; some clients reject anything else here.

use async_trait::async_trait;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};

use super::backend::{DavBackend, Depth, LockOwner, LockRequest, LockResponse, LockScope, LockType};
use super::xml::{DAV_NS, XmlOut, parse_document, to_ascii};
use super::{DavHandler, DavRequest, DavResponse};
use crate::error::DavError;

pub const LOCK_TOKEN: HeaderName = HeaderName::from_static("lock-token");

/// Read the lock request from headers and body.
pub fn parse_lock_request(user: &str, request: &DavRequest) -> Result<LockRequest, DavError> {
    let timeouts = request
        .headers
        .get_all("timeout")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();

    let mut lock = LockRequest {
        user: user.to_string(),
        path: request.path.clone(),
        scope: LockScope::default(),
        lock_type: LockType::default(),
        owner: LockOwner::default(),
        depth: Depth::from_headers(&request.headers),
        timeouts,
    };

    let Some(root) = parse_document(&request.body)? else {
        return Ok(lock);
    };
    let Some(info) = root.find(DAV_NS, "lockinfo") else {
        return Ok(lock);
    };

    for child in info.elements() {
        match child.local_name.as_str() {
            "lockscope" => {
                if let Some(scope) = child.elements().next() {
                    lock.scope = LockScope::parse(&scope.local_name).ok_or_else(|| {
                        DavError::BadRequest(format!("unknown lockscope {}", scope.local_name))
                    })?;
                }
            }
            "locktype" => {
                if let Some(kind) = child.elements().next() {
                    lock.lock_type = LockType::parse(&kind.local_name).ok_or_else(|| {
                        DavError::BadRequest(format!("unknown locktype {}", kind.local_name))
                    })?;
                }
            }
            "owner" => {
                lock.owner = LockOwner {
                    namespace: child.namespace.clone(),
                    value: child.text(),
                    values: child
                        .elements()
                        .map(|el| (el.local_name.clone(), el.text()))
                        .collect(),
                };
            }
            other => debug!(element = %other, "Ignoring lockinfo child"),
        }
    }
    Ok(lock)
}

/// Serialize the `D:prop` / `D:lockdiscovery` document.
pub fn render_lock_response(lock: &LockResponse) -> Result<Vec<u8>, DavError> {
    let mut out = XmlOut::new("us-ascii")?;
    out.start("D:prop", &[("xmlns:D", DAV_NS)])?;
    out.start("D:lockdiscovery", &[])?;
    out.start("D:activelock", &[])?;

    out.start("D:locktype", &[])?;
    out.empty(&format!("D:{}", lock.lock_type.as_str()))?;
    out.end("D:locktype")?;

    out.start("D:lockscope", &[])?;
    out.empty(&format!("D:{}", lock.scope.as_str()))?;
    out.end("D:lockscope")?;

    out.text_element("D:depth", &[], &lock.depth.to_string())?;

    let owner = &lock.owner;
    let ns_attr: Vec<(&str, &str)> = owner
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .map(|ns| ("xmlns:a", ns))
        .into_iter()
        .collect();
    if !owner.value.is_empty() {
        out.text_element("D:owner", &ns_attr, &owner.value)?;
    } else if !owner.values.is_empty() {
        out.start("D:owner", &ns_attr)?;
        for (name, value) in &owner.values {
            out.text_element(&format!("D:{}", name), &[], value)?;
        }
        out.end("D:owner")?;
    } else {
        out.start("D:owner", &ns_attr)?;
        out.end("D:owner")?;
    }

    out.text_element("D:timeout", &[], &lock.timeout)?;

    out.start("D:locktoken", &[])?;
    out.text_element("D:href", &[], &lock.token)?;
    out.end("D:locktoken")?;

    out.end("D:activelock")?;
    out.end("D:lockdiscovery")?;
    out.end("D:prop")?;
    Ok(to_ascii(&out.into_bytes()))
}

pub struct LockHandler {
    backend: Arc<dyn DavBackend>,
}

impl LockHandler {
    pub fn new(backend: Arc<dyn DavBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DavHandler for LockHandler {
    async fn handle(&self, user: &str, request: &DavRequest) -> Result<DavResponse, DavError> {
        let lock = parse_lock_request(user, request)?;

        let Some(granted) = self.backend.lock(&lock) else {
            warn!(path = %lock.path, user = %user, "Backend gave no lock answer");
            return Ok(DavResponse::new(StatusCode::INTERNAL_SERVER_ERROR));
        };

        if granted.status != StatusCode::OK && granted.status != StatusCode::CREATED {
            return Ok(DavResponse::new(granted.status));
        }

        let body = render_lock_response(&granted)?;
        Ok(DavResponse::new(granted.status)
            .header(LOCK_TOKEN, HeaderValue::from_str(&granted.token)?)
            .header(CONTENT_TYPE, HeaderValue::from_static("text/xml; charset=us-ascii"))
            .body(body))
    }
}
