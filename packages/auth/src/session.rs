//! # Signed cookie sessions
//!
//! The server keeps no session storage. A signed-in browser carries a single cookie whose
//! value is the [`SessionRecord`] as base64url-encoded JSON, signed with HMAC by
//! [`SignedCookieJar`]. The signing [`Key`] is built once at startup by [`signing_key`]
//! and injected through application state; it is never mutated afterwards.
//!
//! A missing cookie, a bad signature and an undecodable payload all read back as "no
//! session". Callers cannot tell them apart. There is no revocation: destroying a session
//! only asks the browser to drop its cookie.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::provider::ProviderUser;
use crate::state::cookie_max_age;

/// Minimum secret length accepted by the cookie signing key.
const MIN_SECRET_BYTES: usize = 64;

/// The signed-in user, as stored in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub user_id: String,
    pub display_name: String,
}

impl From<ProviderUser> for SessionRecord {
    fn from(user: ProviderUser) -> Self {
        Self {
            user_id: user.id,
            display_name: user.name,
        }
    }
}

impl SessionRecord {
    fn encode(&self) -> Result<String, AuthError> {
        Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(self)?))
    }

    fn decode(value: &str) -> Result<Self, AuthError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| AuthError::SessionDecodeFailed)?;
        serde_json::from_slice(&bytes).map_err(|_| AuthError::SessionDecodeFailed)
    }
}

/// Build the cookie signing key from a hex-encoded secret of at least 64 bytes.
pub fn signing_key(hex_secret: &str) -> Result<Key, AuthError> {
    let bytes = hex::decode(hex_secret.trim())
        .map_err(|e| AuthError::Config(format!("Invalid session secret hex: {}", e)))?;
    if bytes.len() < MIN_SECRET_BYTES {
        return Err(AuthError::Config(format!(
            "Session secret must be at least {} hex chars ({} bytes), got {} bytes",
            MIN_SECRET_BYTES * 2,
            MIN_SECRET_BYTES,
            bytes.len()
        )));
    }
    Key::try_from(bytes.as_slice()).map_err(|e| AuthError::Config(e.to_string()))
}

/// Issues, reads and destroys the session cookie.
#[derive(Debug, Clone)]
pub struct SessionStore {
    name: String,
    secure: bool,
    max_age: Option<time::Duration>,
}

impl SessionStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: true,
            max_age: None,
        }
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Persist the cookie for `max_age`; `None` keeps it for the browser session only.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Result<Self, AuthError> {
        self.max_age = max_age.map(cookie_max_age).transpose()?;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sign `record` and set it as the session cookie.
    pub fn issue(
        &self,
        jar: SignedCookieJar,
        record: &SessionRecord,
    ) -> Result<SignedCookieJar, AuthError> {
        let mut cookie = self.cookie(record.encode()?);
        if let Some(max_age) = self.max_age {
            cookie.set_max_age(max_age);
        }
        Ok(jar.add(cookie))
    }

    /// Read the session, or `None` when there is no valid one.
    pub fn read(&self, jar: &SignedCookieJar) -> Option<SessionRecord> {
        let cookie = jar.get(&self.name)?;
        match SessionRecord::decode(cookie.value()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Discarding session cookie: {}", e);
                None
            }
        }
    }

    /// Overwrite the session cookie with an expired, empty one.
    pub fn destroy(&self, jar: SignedCookieJar) -> SignedCookieJar {
        let mut cookie = self.cookie(String::new());
        cookie.make_removal();
        jar.add(cookie)
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}
