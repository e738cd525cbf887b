//! Request authentication.
//!
//! Runs once per request, before any verb handler.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{HeaderMap, HeaderValue, header};
use std::collections::HashMap;
use subtle::ConstantTimeEq;

use crate::config::DavUserConfig;

/// Resolves the requesting user from headers.
pub trait Authenticator: Send + Sync {
    /// The authenticated username, or `None` to refuse the request.
    fn authenticate(&self, headers: &HeaderMap) -> Option<String>;

    /// `WWW-Authenticate` value sent with a 401.
    fn challenge(&self) -> HeaderValue;
}

/// HTTP Basic against a fixed account list.
pub struct BasicAuthenticator {
    realm: String,
    users: HashMap<String, String>,
}

impl BasicAuthenticator {
    pub fn new(realm: impl Into<String>, users: &[DavUserConfig]) -> Self {
        Self {
            realm: realm.into(),
            users: users
                .iter()
                .map(|u| (u.name.clone(), u.password.clone()))
                .collect(),
        }
    }

    fn credentials(headers: &HeaderMap) -> Option<(String, String)> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (user, password) = decoded.split_once(':')?;
        Some((user.to_string(), password.to_string()))
    }
}

impl Authenticator for BasicAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Option<String> {
        let (user, password) = Self::credentials(headers)?;
        let expected = self.users.get(&user)?;
        bool::from(expected.as_bytes().ct_eq(password.as_bytes())).then_some(user)
    }

    fn challenge(&self) -> HeaderValue {
        let value = format!("Basic realm=\"{}\"", self.realm);
        HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("Basic"))
    }
}
