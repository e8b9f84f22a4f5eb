//! Session tokens and player pseudonyms.
//!
//! ## Token
//!
//! Opaque per-session string chosen by the client. It is the ownership key
//! of a player and is never shown to anyone else.
//!
//! ## PlayerId
//!
//! Public pseudonym derived from the token with SHA-256. Stable for the
//! lifetime of the session and safe to broadcast.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Opaque client session token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the public pseudonym for this token.
    #[must_use]
    pub fn player_id(&self) -> PlayerId {
        PlayerId::derive(self)
    }
}

// Tokens must not end up in logs.
impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(..)")
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Token {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Public player pseudonym: lowercase hex SHA-256 of the token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Hash a token into its pseudonym.
    #[must_use]
    pub fn derive(token: &Token) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_str().as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Borrow the hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
