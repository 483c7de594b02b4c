//! # CSRF state guard
//!
//! Each login attempt gets a fresh [`StateToken`]. The token travels twice: once in a
//! short-lived cookie scoped to the provider's callback path, and once as the `state`
//! parameter of the authorization URL. The callback is only accepted when both copies
//! come back and are equal, which binds it to the browser that started the login.
//!
//! Nothing is kept server-side, so concurrent logins from different browsers or tabs
//! cannot interfere with each other.
//!
//! ```text
//! Idle --login--> Pending --callback, match--> Validated (cookie cleared)
//!                         --callback, missing/mismatch--> Rejected
//! ```

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use oauth2::CsrfToken;

use crate::error::AuthError;
use crate::provider::Provider;

/// Random bytes per token. Encoded as base64url.
const STATE_TOKEN_BYTES: u32 = 32;

/// Opaque, single-use CSRF state value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateToken(String);

impl StateToken {
    /// Generate a token from the OS-seeded CSPRNG.
    pub fn new_random() -> Self {
        Self(CsrfToken::new_random_len(STATE_TOKEN_BYTES).secret().clone())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for StateToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Issues and checks the per-provider state cookie.
#[derive(Debug, Clone)]
pub struct StateGuard {
    max_age: time::Duration,
    secure: bool,
}

impl StateGuard {
    /// Fails when `max_age` does not fit a cookie `Max-Age`.
    pub fn new(max_age: Duration) -> Result<Self, AuthError> {
        Ok(Self {
            max_age: cookie_max_age(max_age)?,
            secure: true,
        })
    }

    /// Set to `false` only for plain-HTTP development servers.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Start a login attempt: generate a token and store it in the state cookie.
    pub fn begin(&self, jar: CookieJar, provider: Provider) -> (CookieJar, StateToken) {
        let token = StateToken::new_random();
        let jar = self.issue(jar, provider, &token);
        (jar, token)
    }

    fn issue(&self, jar: CookieJar, provider: Provider, token: &StateToken) -> CookieJar {
        let mut cookie = self.cookie(provider, token.as_str().to_string());
        cookie.set_max_age(self.max_age);
        jar.add(cookie)
    }

    /// Expire the state cookie. Called once a callback has passed validation,
    /// whether or not the rest of the login succeeds.
    pub fn clear(&self, jar: CookieJar, provider: Provider) -> CookieJar {
        let mut removal = self.cookie(provider, String::new());
        removal.make_removal();
        jar.add(removal)
    }

    /// Check the callback's `state` parameter against the state cookie.
    ///
    /// On success the returned jar clears the cookie so the token cannot be replayed.
    pub fn validate(
        &self,
        jar: CookieJar,
        provider: Provider,
        query_state: Option<&str>,
    ) -> Result<CookieJar, AuthError> {
        let cookie_state = jar
            .get(&provider.state_cookie_name())
            .map(|c| c.value().to_string());

        match (cookie_state.as_deref(), query_state) {
            (Some(expected), Some(received)) if !expected.is_empty() && expected == received => {
                Ok(self.clear(jar, provider))
            }
            (None, _) => {
                tracing::warn!(%provider, "OAuth callback without state cookie");
                Err(AuthError::CsrfMismatch)
            }
            (_, None) => {
                tracing::warn!(%provider, "OAuth callback without state parameter");
                Err(AuthError::CsrfMismatch)
            }
            _ => {
                tracing::warn!(%provider, "OAuth state mismatch");
                Err(AuthError::CsrfMismatch)
            }
        }
    }

    fn cookie(&self, provider: Provider, value: String) -> Cookie<'static> {
        Cookie::build((provider.state_cookie_name(), value))
            .path(provider.callback_path())
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }
}

/// Convert a configured lifetime to a cookie `Max-Age`, rejecting values that overflow.
pub(crate) fn cookie_max_age(max_age: Duration) -> Result<time::Duration, AuthError> {
    i64::try_from(max_age.as_secs())
        .map(time::Duration::seconds)
        .map_err(|_| {
            AuthError::Config(format!(
                "Cookie max age of {} seconds is out of range",
                max_age.as_secs()
            ))
        })
}
