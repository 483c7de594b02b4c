//! # Google endpoints and user-info mapping
//!
//! Google signs users in through the standard authorization-code flow. The profile is read
//! from the v2 userinfo endpoint (`googleapis.com/oauth2/v2/userinfo`), which returns the
//! account id and full name when the `profile` scope was granted.

use serde::Deserialize;

use crate::provider::ProviderUser;

pub const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const SCOPES: &[&str] = &["profile", "email"];

/// Google user info from API.
#[derive(Debug, Deserialize)]
pub(crate) struct GoogleUser {
    id: String,
    name: String,
}

impl From<GoogleUser> for ProviderUser {
    fn from(user: GoogleUser) -> Self {
        ProviderUser {
            id: user.id,
            name: user.name,
        }
    }
}
