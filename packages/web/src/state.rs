//! Shared, read-only application state.

use std::sync::Arc;
use std::time::Duration;

use auth::{
    signing_key, AuthError, OAuthClient, OAuthConfig, Provider, SessionStore, StateGuard,
};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::settings::Settings;

/// One client per supported provider.
#[derive(Debug)]
pub struct Providers {
    pub google: OAuthClient,
    pub facebook: OAuthClient,
}

impl Providers {
    pub fn get(&self, provider: Provider) -> &OAuthClient {
        match provider {
            Provider::Google => &self.google,
            Provider::Facebook => &self.facebook,
        }
    }
}

struct Inner {
    providers: Providers,
    state_guard: StateGuard,
    sessions: SessionStore,
    key: Key,
}

/// Cheap to clone; built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new(
        providers: Providers,
        state_guard: StateGuard,
        sessions: SessionStore,
        key: Key,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                providers,
                state_guard,
                sessions,
                key,
            }),
        }
    }

    /// Validate settings into provider clients, cookie policies and the signing key.
    pub fn from_settings(settings: &Settings) -> Result<Self, AuthError> {
        let timeout = Duration::from_secs(settings.auth.http_timeout_secs);
        let redirect_base = settings.auth.redirect_base.as_str();

        let google = OAuthClient::new(
            Provider::Google,
            OAuthConfig::google(&settings.google, redirect_base)?,
            timeout,
        )?;
        let facebook = OAuthClient::new(
            Provider::Facebook,
            OAuthConfig::facebook(&settings.facebook, redirect_base)?,
            timeout,
        )?;

        let state_guard = StateGuard::new(Duration::from_secs(settings.auth.state_max_age_secs))?
            .with_secure(settings.session.secure);
        let sessions = SessionStore::new(settings.session.name.clone())
            .with_secure(settings.session.secure)
            .with_max_age(settings.session.max_age_secs.map(Duration::from_secs))?;
        let key = signing_key(&settings.session.secret)?;

        Ok(Self::new(
            Providers { google, facebook },
            state_guard,
            sessions,
            key,
        ))
    }

    pub fn client(&self, provider: Provider) -> &OAuthClient {
        self.inner.providers.get(provider)
    }

    pub fn state_guard(&self) -> &StateGuard {
        &self.inner.state_guard
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }
}

/// Lets `SignedCookieJar` pull the signing key out of the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.key.clone()
    }
}
