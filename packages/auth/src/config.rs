//! OAuth provider configuration.

use oauth2::url::Url;
use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, Scope, TokenUrl};
use serde::Deserialize;

use crate::error::AuthError;
use crate::provider::Provider;
use crate::{facebook, google};

/// Client credentials issued by a provider's developer console.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// OAuth provider configuration. Immutable once built.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub userinfo_url: Url,
    pub redirect_url: RedirectUrl,
    pub scopes: Vec<Scope>,
}

impl OAuthConfig {
    /// Create Google OAuth config. `redirect_base` is the externally visible server origin.
    pub fn google(credentials: &Credentials, redirect_base: &str) -> Result<Self, AuthError> {
        Self::new(
            Provider::Google,
            credentials,
            redirect_base,
            google::AUTH_URL,
            google::TOKEN_URL,
            google::USERINFO_URL,
            google::SCOPES,
        )
    }

    /// Create Facebook OAuth config.
    pub fn facebook(credentials: &Credentials, redirect_base: &str) -> Result<Self, AuthError> {
        Self::new(
            Provider::Facebook,
            credentials,
            redirect_base,
            facebook::AUTH_URL,
            facebook::TOKEN_URL,
            facebook::USERINFO_URL,
            facebook::SCOPES,
        )
    }

    /// Create the config for `provider` with its default endpoints.
    pub fn for_provider(
        provider: Provider,
        credentials: &Credentials,
        redirect_base: &str,
    ) -> Result<Self, AuthError> {
        match provider {
            Provider::Google => Self::google(credentials, redirect_base),
            Provider::Facebook => Self::facebook(credentials, redirect_base),
        }
    }

    fn new(
        provider: Provider,
        credentials: &Credentials,
        redirect_base: &str,
        auth_url: &str,
        token_url: &str,
        userinfo_url: &str,
        scopes: &[&str],
    ) -> Result<Self, AuthError> {
        if credentials.client_id.trim().is_empty() {
            return Err(AuthError::Config(format!(
                "Missing {} Client ID",
                provider.display_name()
            )));
        }
        if credentials.client_secret.trim().is_empty() {
            return Err(AuthError::Config(format!(
                "Missing {} Client Secret",
                provider.display_name()
            )));
        }

        let redirect_uri = format!(
            "{}{}",
            redirect_base.trim_end_matches('/'),
            provider.callback_path()
        );

        Ok(Self {
            client_id: ClientId::new(credentials.client_id.clone()),
            client_secret: ClientSecret::new(credentials.client_secret.clone()),
            auth_url: AuthUrl::new(auth_url.to_string()).map_err(config_error)?,
            token_url: TokenUrl::new(token_url.to_string()).map_err(config_error)?,
            userinfo_url: Url::parse(userinfo_url).map_err(config_error)?,
            redirect_url: RedirectUrl::new(redirect_uri).map_err(config_error)?,
            scopes: scopes.iter().map(|s| Scope::new(s.to_string())).collect(),
        })
    }

    /// Point the config at different endpoints, e.g. a local stand-in for the provider.
    pub fn with_endpoints(
        mut self,
        auth_url: &str,
        token_url: &str,
        userinfo_url: &str,
    ) -> Result<Self, AuthError> {
        self.auth_url = AuthUrl::new(auth_url.to_string()).map_err(config_error)?;
        self.token_url = TokenUrl::new(token_url.to_string()).map_err(config_error)?;
        self.userinfo_url = Url::parse(userinfo_url).map_err(config_error)?;
        Ok(self)
    }
}

fn config_error(e: impl std::fmt::Display) -> AuthError {
    AuthError::Config(e.to_string())
}
