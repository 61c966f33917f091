//! Core library for survey-login.
//!
//! Provides the pieces a front end needs to sign in to the Survey API:
//!
//! - `api`: HTTP client for the auth and survey endpoints
//! - `login`: the login form submission handler
//! - `auth`: persistent token storage backends
//! - `models`: wire types shared with the server
//! - `config`: user configuration on disk

pub mod api;
pub mod auth;
pub mod config;
pub mod login;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use config::{Config, TokenBackend};
pub use login::{
    FormFields, LoginError, LoginOutcome, LoginSubmissionHandler, LoginView, SubmitEvent,
    DASHBOARD_TARGET, LOGIN_FAILED_FALLBACK,
};
