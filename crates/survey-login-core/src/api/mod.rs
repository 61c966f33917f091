//! REST API client module for the Survey API.
//!
//! This module provides the `ApiClient` for signing in, creating accounts,
//! and fetching the signed-in user's surveys.
//!
//! The API issues a JWT from `/api/auth/login`; survey endpoints expect it
//! as a bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthReply, DEFAULT_API_BASE_URL, LOGIN_PATH};
pub use error::ApiError;
