//! # Provider clients
//!
//! [`Provider`] tags the two supported identity providers; [`OAuthClient`] is the one
//! client type both share. The variants differ only in configuration ([`OAuthConfig`])
//! and in how the user-info response maps onto [`ProviderUser`].
//!
//! Token and profile requests go through a single `reqwest` client built with a bounded
//! timeout and redirects disabled. A timeout surfaces as the same error as a rejected
//! request; nothing is retried.

use std::fmt;
use std::time::Duration;

use oauth2::basic::BasicClient;
use oauth2::url::Url;
use oauth2::{
    AccessToken, AuthType, AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, Scope,
    TokenResponse,
};
use serde::Deserialize;

use crate::config::OAuthConfig;
use crate::error::AuthError;
use crate::facebook::{self, FacebookUser};
use crate::google::GoogleUser;
use crate::state::StateToken;

/// Supported identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    /// Identifier used in routes and cookie names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::Facebook => "Facebook",
        }
    }

    pub fn login_path(&self) -> String {
        format!("/{}/login", self.as_str())
    }

    pub fn callback_path(&self) -> String {
        format!("/{}/callback", self.as_str())
    }

    /// Name of the cookie holding the pending login's state token.
    pub fn state_cookie_name(&self) -> String {
        format!("{}_oauth_state", self.as_str())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUser {
    pub id: String,
    pub name: String,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Authorization-code client for one provider.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    provider: Provider,
    client: ConfiguredClient,
    scopes: Vec<Scope>,
    userinfo_url: Url,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(
        provider: Provider,
        config: OAuthConfig,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = BasicClient::new(config.client_id)
            .set_client_secret(config.client_secret)
            .set_auth_uri(config.auth_url)
            .set_token_uri(config.token_url)
            .set_redirect_uri(config.redirect_url)
            .set_auth_type(AuthType::RequestBody);

        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Config(e.to_string()))?;

        Ok(Self {
            provider,
            client,
            scopes: config.scopes,
            userinfo_url: config.userinfo_url,
            http,
        })
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Authorization URL carrying client id, redirect URL, scopes,
    /// `response_type=code` and the given state.
    pub fn login_url(&self, state: &StateToken) -> Url {
        let state = CsrfToken::new(state.as_str().to_string());
        let (url, _) = self
            .client
            .authorize_url(move || state)
            .add_scopes(self.scopes.iter().cloned())
            .url();
        url
    }

    /// Exchange an authorization code for an access token at the token endpoint.
    pub async fn exchange_code(&self, code: &str) -> Result<AccessToken, AuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| {
                tracing::error!(provider = %self.provider, "Token exchange failed: {}", e);
                AuthError::TokenExchangeFailed(e.to_string())
            })?;

        Ok(token.access_token().clone())
    }

    /// Fetch the signed-in user's id and name from the provider's user-info endpoint.
    pub async fn fetch_user(&self, token: &AccessToken) -> Result<ProviderUser, AuthError> {
        let mut request = self
            .http
            .get(self.userinfo_url.clone())
            .bearer_auth(token.secret());
        if self.provider == Provider::Facebook {
            request = request.query(&[("fields", facebook::USERINFO_FIELDS)]);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| self.user_fetch_failed(e))?;

        let user: ProviderUser = match self.provider {
            Provider::Google => response.json::<GoogleUser>().await.map(Into::into),
            Provider::Facebook => response.json::<FacebookUser>().await.map(Into::into),
        }
        .map_err(|e| self.user_fetch_failed(e))?;

        if user.id.is_empty() {
            return Err(self.user_fetch_failed("empty user id"));
        }

        Ok(user)
    }

    fn user_fetch_failed(&self, e: impl fmt::Display) -> AuthError {
        tracing::error!(provider = %self.provider, "User fetch failed: {}", e);
        AuthError::UserFetchFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Credentials;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(provider: Provider, server: &MockServer) -> OAuthClient {
        let credentials = Credentials {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
        };
        let config = OAuthConfig::for_provider(provider, &credentials, "http://localhost:8080")
            .unwrap()
            .with_endpoints(
                &format!("{}/authorize", server.uri()),
                &format!("{}/token", server.uri()),
                &format!("{}/userinfo", server.uri()),
            )
            .unwrap();
        OAuthClient::new(provider, config, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_provider_paths() {
        assert_eq!(Provider::Google.login_path(), "/google/login");
        assert_eq!(Provider::Facebook.callback_path(), "/facebook/callback");
        assert_eq!(Provider::Facebook.state_cookie_name(), "facebook_oauth_state");
        assert_eq!(Provider::Google.to_string(), "google");
    }

    #[tokio::test]
    async fn test_login_url() {
        let server = MockServer::start().await;
        let client = client_for(Provider::Google, &server);

        let url = client.login_url(&StateToken::from("abc123".to_string()));
        assert_eq!(url.path(), "/authorize");

        let pairs: std::collections::HashMap<String, String> =
            url.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "test-client");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["state"], "abc123");
        assert_eq!(pairs["redirect_uri"], "http://localhost:8080/google/callback");
        assert_eq!(pairs["scope"], "profile email");
        assert!(!pairs.contains_key("client_secret"));
    }

    #[tokio::test]
    async fn test_exchange_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=validcode"))
            .and(body_string_contains("client_id=test-client"))
            .and(body_string_contains("client_secret=test-secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.token",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(Provider::Google, &server);
        let token = client.exchange_code("validcode").await.unwrap();
        assert_eq!(token.secret(), "ya29.token");
    }

    #[tokio::test]
    async fn test_exchange_code_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_grant",
                "error_description": "Bad Request"
            })))
            .mount(&server)
            .await;

        let client = client_for(Provider::Google, &server);
        let result = client.exchange_code("expired").await;
        assert!(matches!(result, Err(AuthError::TokenExchangeFailed(_))));
    }

    #[tokio::test]
    async fn test_exchange_code_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(Provider::Facebook, &server);
        let result = client.exchange_code("validcode").await;
        assert!(matches!(result, Err(AuthError::TokenExchangeFailed(_))));
    }

    #[tokio::test]
    async fn test_exchange_code_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "access_token": "late",
                        "token_type": "bearer"
                    }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let credentials = Credentials {
            client_id: "test-client".into(),
            client_secret: "test-secret".into(),
        };
        let config = OAuthConfig::google(&credentials, "http://localhost:8080")
            .unwrap()
            .with_endpoints(
                &format!("{}/authorize", server.uri()),
                &format!("{}/token", server.uri()),
                &format!("{}/userinfo", server.uri()),
            )
            .unwrap();
        let client =
            OAuthClient::new(Provider::Google, config, Duration::from_millis(200)).unwrap();

        let result = client.exchange_code("validcode").await;
        assert!(matches!(result, Err(AuthError::TokenExchangeFailed(_))));
    }

    #[tokio::test]
    async fn test_fetch_google_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "42",
                "name": "Ada",
                "email": "ada@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(Provider::Google, &server);
        let user = client
            .fetch_user(&AccessToken::new("tok".to_string()))
            .await
            .unwrap();
        assert_eq!(
            user,
            ProviderUser {
                id: "42".into(),
                name: "Ada".into()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_facebook_user_requests_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(query_param("fields", "id,name"))
            .and(header("authorization", "Bearer fbtok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "10224",
                "name": "Grace"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(Provider::Facebook, &server);
        let user = client
            .fetch_user(&AccessToken::new("fbtok".to_string()))
            .await
            .unwrap();
        assert_eq!(user.id, "10224");
        assert_eq!(user.name, "Grace");
    }

    #[tokio::test]
    async fn test_fetch_user_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer revoked"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer partial"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "42" })),
            )
            .mount(&server)
            .await;

        let client = client_for(Provider::Google, &server);

        let result = client.fetch_user(&AccessToken::new("revoked".to_string())).await;
        assert!(matches!(result, Err(AuthError::UserFetchFailed(_))));

        let result = client.fetch_user(&AccessToken::new("partial".to_string())).await;
        assert!(matches!(result, Err(AuthError::UserFetchFailed(_))));
    }
}
