//! Facebook endpoints and user-info mapping.
//!
//! The Graph API only returns the fields it is asked for, so the profile request carries
//! `fields=id,name`.

use serde::Deserialize;

use crate::provider::ProviderUser;

pub const AUTH_URL: &str = "https://www.facebook.com/v3.2/dialog/oauth";
pub const TOKEN_URL: &str = "https://graph.facebook.com/v3.2/oauth/access_token";
pub const USERINFO_URL: &str = "https://graph.facebook.com/me";
pub const SCOPES: &[&str] = &["public_profile"];

/// Value of the `fields` query parameter sent with the profile request.
pub const USERINFO_FIELDS: &str = "id,name";

#[derive(Debug, Deserialize)]
pub(crate) struct FacebookUser {
    id: String,
    name: String,
}

impl From<FacebookUser> for ProviderUser {
    fn from(user: FacebookUser) -> Self {
        ProviderUser {
            id: user.id,
            name: user.name,
        }
    }
}
