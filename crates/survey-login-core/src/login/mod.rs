//! Login form submission handling.
//!
//! A front end wraps its form in a `SubmitEvent`, implements `LoginView`
//! for the error line and page navigation, and hands both to
//! `LoginSubmissionHandler::handle_submit`.

pub mod event;
pub mod handler;

pub use event::{FormFields, SubmitEvent};
pub use handler::{
    LoginError, LoginOutcome, LoginSubmissionHandler, LoginView, DASHBOARD_TARGET,
    LOGIN_FAILED_FALLBACK, PASSWORD_FIELD, USERNAME_FIELD,
};
