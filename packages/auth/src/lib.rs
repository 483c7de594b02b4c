//! # Auth crate — OAuth2 login and signed cookie sessions
//!
//! This crate holds everything the `web` server needs to sign a browser in through a
//! third-party OAuth2 provider and keep it signed in without any server-side storage.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Per-provider client id/secret, endpoints, redirect URL and scopes |
//! | [`provider`] | The [`Provider`] tag and [`OAuthClient`]: authorize URL, code exchange, user fetch |
//! | [`google`] / [`facebook`] | Endpoint constants and user-info field mapping per provider |
//! | [`state`] | CSRF state token issued at login and checked at callback |
//! | [`session`] | Signed cookie carrying the signed-in user's id and display name |
//! | [`error`] | [`AuthError`], the failure taxonomy shared by all of the above |
//!
//! ## Flow
//!
//! 1. `GET /{provider}/login` — [`StateGuard::begin`] sets the state cookie, the browser is
//!    sent to [`OAuthClient::login_url`].
//! 2. `GET /{provider}/callback` — [`StateGuard::validate`] compares cookie and query state,
//!    then [`OAuthClient::exchange_code`] and [`OAuthClient::fetch_user`] run, and
//!    [`SessionStore::issue`] sets the session cookie.
//! 3. Every later request reads the session back with [`SessionStore::read`].

pub mod config;
pub mod error;
pub mod facebook;
pub mod google;
pub mod provider;
pub mod session;
pub mod state;

pub use config::{Credentials, OAuthConfig};
pub use error::AuthError;
pub use oauth2::url::Url;
pub use oauth2::AccessToken;
pub use provider::{OAuthClient, Provider, ProviderUser};
pub use session::{signing_key, SessionRecord, SessionStore};
pub use state::{StateGuard, StateToken};
