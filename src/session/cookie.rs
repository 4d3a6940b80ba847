//! Session cookie codec.
//!
//! # Responsibilities
//! - Read and verify the session cookie on inbound requests
//! - Mint fresh session ids when the cookie is absent or tampered
//! - Render the Set-Cookie value with the configured attributes
//!
//! # Design Decisions
//! - Cookie value is `id.hex(hmac_sha256(secret, id))`; verification is
//!   constant-time through the mac itself
//! - A cookie that fails verification silently gets a fresh session;
//!   nothing about the failure leaks to the client

use std::sync::Arc;

use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use crate::config::schema::{SameSite, SessionConfig};
use crate::session::{Session, SessionStore};

type HmacSha256 = Hmac<Sha256>;

/// Signs and parses session cookies.
pub struct CookieCodec {
    name: String,
    secret: Vec<u8>,
    max_age_secs: u64,
    same_site: SameSite,
    secure: bool,
}

impl CookieCodec {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secret: config.secret.as_bytes().to_vec(),
            max_age_secs: config.max_age_secs,
            same_site: config.same_site,
            secure: config.secure,
        }
    }

    /// Session handle for one request: the verified id from the cookie,
    /// or a fresh one.
    pub fn session_from_headers(
        &self,
        headers: &HeaderMap,
        store: Arc<dyn SessionStore>,
    ) -> Session {
        if let Some(id) = self.cookie_value(headers).and_then(|v| self.verify(&v)) {
            return Session::new(id, false, store);
        }
        Session::new(Uuid::new_v4().to_string(), true, store)
    }

    /// Render the Set-Cookie header value for a session.
    pub fn set_cookie(&self, session: &Session) -> HeaderValue {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; Max-Age={}; SameSite={}",
            self.name,
            self.sign(session.id()),
            self.max_age_secs,
            self.same_site,
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    fn cookie_value(&self, headers: &HeaderMap) -> Option<String> {
        for header in headers.get_all(COOKIE) {
            let Ok(raw) = header.to_str() else { continue };
            for pair in raw.split(';') {
                let pair = pair.trim();
                if let Some(value) = pair.strip_prefix(&self.name) {
                    if let Some(value) = value.strip_prefix('=') {
                        return Some(value.to_string());
                    }
                }
            }
        }
        None
    }

    fn sign(&self, id: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key length");
        mac.update(id.as_bytes());
        format!("{id}.{}", hex::encode(mac.finalize().into_bytes()))
    }

    fn verify(&self, value: &str) -> Option<String> {
        let (id, signature) = value.rsplit_once('.')?;
        let signature = hex::decode(signature).ok()?;
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts any key length");
        mac.update(id.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(id.to_string())
    }
}
