//! # Web crate — the login server
//!
//! Wires the [`auth`] crate into an axum [`Router`](axum::Router):
//!
//! - [`settings`] — layered configuration (`config.toml`, `APP__*` environment variables)
//! - [`state`] — [`AppState`], the immutable per-process state handed to every handler
//! - [`routes`] — login, callback, profile and logout handlers
//! - [`views`] — the two HTML pages

pub mod routes;
pub mod settings;
pub mod state;
pub mod views;

pub use routes::router;
pub use settings::Settings;
pub use state::{AppState, Providers};
