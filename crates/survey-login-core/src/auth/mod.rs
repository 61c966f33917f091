//! Token storage for signed-in sessions.
//!
//! This module provides:
//! - `TokenStore`: key/value persistence for the session token
//! - `FileTokenStore`: JSON file in the cache directory
//! - `KeyringTokenStore`: OS keychain via keyring
//! - `MemoryTokenStore`: process-local map, used by tests and dry runs
//!
//! The token is always kept under the key `"token"`. Writes overwrite;
//! concurrent writers race and the last one wins.

pub mod file;
pub mod keychain;
pub mod memory;
pub mod store;

pub use file::{FileTokenStore, StoredToken};
pub use keychain::KeyringTokenStore;
pub use memory::MemoryTokenStore;
pub use store::{TokenStore, TOKEN_KEY};
