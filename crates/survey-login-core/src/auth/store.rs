use std::sync::Arc;

use anyhow::Result;

/// Storage key the session token lives under
pub const TOKEN_KEY: &str = "token";

/// Persistent store for the session token.
///
/// Methods take `&self` so one store can back concurrent submissions.
pub trait TokenStore: Send + Sync {
    /// Write the token under `TOKEN_KEY`, replacing any previous value
    fn set_token(&self, token: &str) -> Result<()>;

    /// Read the stored token, if any
    fn token(&self) -> Result<Option<String>>;

    /// Remove the stored token. Removing a missing token is not an error.
    fn clear(&self) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Box<T> {
    fn set_token(&self, token: &str) -> Result<()> {
        (**self).set_token(token)
    }

    fn token(&self) -> Result<Option<String>> {
        (**self).token()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn set_token(&self, token: &str) -> Result<()> {
        (**self).set_token(token)
    }

    fn token(&self) -> Result<Option<String>> {
        (**self).token()
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
