//! Storage collaborator behind the WebDAV verbs.
//!
//! The router never touches storage itself; it asks a [`DavBackend`] to
//! grant locks and list resources. [`MemoryBackend`] serves the resources
//! named in the config file and keeps locks in memory.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use http::{HeaderMap, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;
use uuid::Uuid;

use crate::config::DavResourceConfig;

/// Timeout granted when the client asks for none we can honour.
pub const DEFAULT_TIMEOUT: &str = "Second-3600";

/// Longest timeout granted, in seconds (RFC 4918 `TimeType` ceiling).
pub const MAX_TIMEOUT_SECS: u64 = u32::MAX as u64;

/// `Depth` request header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Depth {
    Zero,
    One,
    #[default]
    Infinity,
}

impl Depth {
    /// Read the `Depth` header; absent or unrecognized means infinity.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get("depth").and_then(|v| v.to_str().ok()).map(str::trim) {
            Some("0") => Self::Zero,
            Some("1") => Self::One,
            _ => Self::Infinity,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockScope {
    #[default]
    Exclusive,
    Shared,
}

impl LockScope {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "exclusive" => Some(Self::Exclusive),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exclusive => "exclusive",
            Self::Shared => "shared",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockType {
    #[default]
    Write,
}

impl LockType {
    pub fn parse(name: &str) -> Option<Self> {
        name.eq_ignore_ascii_case("write").then_some(Self::Write)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Write => "write",
        }
    }
}

/// Lock owner as supplied by the client and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockOwner {
    /// Namespace URI of the `owner` element.
    pub namespace: Option<String>,
    /// Text content of `owner`.
    pub value: String,
    /// Child elements as (local name, text) pairs.
    pub values: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRequest {
    pub user: String,
    pub path: String,
    pub scope: LockScope,
    pub lock_type: LockType,
    pub owner: LockOwner,
    pub depth: Depth,
    /// `Timeout` header values in order of preference.
    pub timeouts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockResponse {
    pub status: StatusCode,
    pub token: String,
    pub scope: LockScope,
    pub lock_type: LockType,
    pub depth: Depth,
    pub owner: LockOwner,
    pub timeout: String,
}

/// One listed resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DavResource {
    pub path: String,
    pub collection: bool,
    pub content_type: Option<String>,
    pub content_length: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl DavResource {
    /// Last path segment, or `/` for the root.
    pub fn display_name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("/")
    }

    pub fn from_config(config: &DavResourceConfig, now: DateTime<Utc>) -> Self {
        Self {
            path: normalize(&config.path).to_string(),
            collection: config.collection,
            content_type: config.content_type.clone(),
            content_length: config.length,
            created: now,
            modified: now,
        }
    }
}

/// The two callbacks the verbs need.
pub trait DavBackend: Send + Sync {
    /// Grant or refuse a lock. `None` means the backend could not decide.
    fn lock(&self, request: &LockRequest) -> Option<LockResponse>;

    /// Resources visible to `user` at `path`, expanded to `depth`.
    fn propfind(&self, user: &str, path: &str, depth: Depth) -> Vec<DavResource>;
}

/// `/a/b/` and `/a/b` name the same resource.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Seconds in a `Second-N` timeout; `None` for `Infinite` or garbage.
/// Seconds in a `Second-N` value, clamped to [`MAX_TIMEOUT_SECS`].
fn timeout_secs(value: &str) -> Option<u64> {
    let digits = value.strip_prefix("Second-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // All digits, so a parse failure can only be overflow.
    Some(digits.parse().map_or(MAX_TIMEOUT_SECS, |secs: u64| secs.min(MAX_TIMEOUT_SECS)))
}

struct ActiveLock {
    token: String,
    scope: LockScope,
    expires: Option<Instant>,
}

impl ActiveLock {
    fn expired(&self, now: Instant) -> bool {
        self.expires.is_some_and(|at| at <= now)
    }
}

/// Resources from config, locks in memory.
pub struct MemoryBackend {
    resources: Vec<DavResource>,
    locks: DashMap<String, Vec<ActiveLock>>,
}

impl MemoryBackend {
    pub fn new(resources: Vec<DavResource>) -> Self {
        Self {
            resources,
            locks: DashMap::new(),
        }
    }

    pub fn from_config(resources: &[DavResourceConfig]) -> Self {
        let now = Utc::now();
        Self::new(
            resources
                .iter()
                .map(|r| DavResource::from_config(r, now))
                .collect(),
        )
    }

    fn is_child(base: &str, candidate: &str, depth: Depth) -> bool {
        let rest = if base == "/" {
            candidate.strip_prefix('/')
        } else {
            candidate
                .strip_prefix(base)
                .and_then(|rest| rest.strip_prefix('/'))
        };
        match rest {
            Some(rest) if !rest.is_empty() => match depth {
                Depth::Zero => false,
                Depth::One => !rest.contains('/'),
                Depth::Infinity => true,
            },
            _ => false,
        }
    }
}

impl DavBackend for MemoryBackend {
    fn lock(&self, request: &LockRequest) -> Option<LockResponse> {
        let path = normalize(&request.path).to_string();
        let now = Instant::now();

        // Timeouts the client offered that we understand; Infinite is not granted.
        let timeout = request
            .timeouts
            .iter()
            .find_map(|t| timeout_secs(t))
            .map_or_else(|| DEFAULT_TIMEOUT.to_string(), |secs| format!("Second-{secs}"));

        let mut held = self.locks.entry(path.clone()).or_default();
        held.retain(|lock| !lock.expired(now));

        let conflict = held.iter().any(|lock| {
            lock.scope == LockScope::Exclusive || request.scope == LockScope::Exclusive
        });

        let mut response = LockResponse {
            status: StatusCode::OK,
            token: String::new(),
            scope: request.scope,
            lock_type: request.lock_type,
            depth: request.depth,
            owner: request.owner.clone(),
            timeout,
        };

        if conflict {
            let tokens: Vec<&str> = held.iter().map(|lock| lock.token.as_str()).collect();
            debug!(path = %path, held = ?tokens, "Lock conflict");
            response.status = StatusCode::LOCKED;
            return Some(response);
        }

        response.token = format!("opaquelocktoken:{}", Uuid::new_v4());
        // Past the clock's range the lock simply never expires.
        let expires = timeout_secs(&response.timeout)
            .and_then(|secs| now.checked_add(Duration::from_secs(secs)));
        held.push(ActiveLock {
            token: response.token.clone(),
            scope: request.scope,
            expires,
        });

        if !self.resources.iter().any(|r| r.path == path) {
            // Lock on an unmapped URL reserves the name.
            response.status = StatusCode::CREATED;
        }
        debug!(path = %path, token = %response.token, status = %response.status, "Lock granted");
        Some(response)
    }

    fn propfind(&self, _user: &str, path: &str, depth: Depth) -> Vec<DavResource> {
        let base = normalize(path);
        let Some(target) = self.resources.iter().find(|r| r.path == base) else {
            return Vec::new();
        };

        let mut found = vec![target.clone()];
        if target.collection {
            found.extend(
                self.resources
                    .iter()
                    .filter(|r| Self::is_child(base, &r.path, depth))
                    .cloned(),
            );
        }
        found
    }
}
