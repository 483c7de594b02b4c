//! # HTTP routes
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | GET | `/{provider}/login` | [`login`] — set state cookie, 302 to the provider |
//! | GET | `/{provider}/callback` | [`callback`] — validate state, exchange code, fetch user, issue session, 302 to `/profile` |
//! | GET | `/`, `/profile` | [`profile`] — signed-in view or anonymous welcome |
//! | POST | `/logout` | [`logout`] — destroy session, 302 to `/` |
//!
//! Any other method on `/logout` redirects to `/` and leaves the session alone.
//! Callback failures answer 500 with the error message and set no session cookie. Once the
//! state has been validated the state cookie is cleared, whether or not the login completes.

use auth::{AuthError, Provider, SessionRecord};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::views;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(profile))
        .route("/profile", get(profile))
        .route("/logout", post(logout).fallback(logout_redirect))
        .route("/{provider}/login", get(login))
        .route("/{provider}/callback", get(callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 302 Found to `location`.
fn found(location: impl Into<String>) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.into())]).into_response()
}

/// Query parameters the provider sends back to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<Provider>,
    jar: CookieJar,
) -> Response {
    let (jar, token) = state.state_guard().begin(jar, provider);
    let url = state.client(provider).login_url(&token);
    tracing::info!(%provider, "Starting OAuth login");
    (jar, found(url.to_string())).into_response()
}

pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<Provider>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
    sessions: SignedCookieJar,
) -> Result<Response, AuthError> {
    let jar = state
        .state_guard()
        .validate(jar, provider, params.state.as_deref())?;

    // The state is spent from here on: every response carries the cleared cookie.
    match complete_login(&state, provider, params, sessions).await {
        Ok(sessions) => Ok((jar, sessions, found("/profile")).into_response()),
        Err(e) => Ok((jar, e).into_response()),
    }
}

/// Exchange the code, fetch the user and issue the session.
async fn complete_login(
    state: &AppState,
    provider: Provider,
    params: CallbackParams,
    sessions: SignedCookieJar,
) -> Result<SignedCookieJar, AuthError> {
    if let Some(error) = params.error {
        tracing::warn!(%provider, "Provider returned error: {}", error);
        return Err(AuthError::TokenExchangeFailed(format!(
            "provider returned error: {}",
            error
        )));
    }
    let code = params
        .code
        .ok_or_else(|| AuthError::TokenExchangeFailed("missing authorization code".into()))?;

    let client = state.client(provider);
    let token = client.exchange_code(&code).await?;
    let user = client.fetch_user(&token).await?;

    let record = SessionRecord::from(user);
    let sessions = state.sessions().issue(sessions, &record)?;
    tracing::info!(%provider, user_id = %record.user_id, "Issued session");

    Ok(sessions)
}

pub async fn profile(State(state): State<AppState>, jar: SignedCookieJar) -> Html<String> {
    match state.sessions().read(&jar) {
        Some(record) => Html(views::profile(&record)),
        None => Html(views::welcome().to_string()),
    }
}

pub async fn logout(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    (state.sessions().destroy(jar), found("/")).into_response()
}

async fn logout_redirect() -> Response {
    found("/")
}
