//! Session identifier generation and persistence.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StorageError;
use crate::storage::KeyValueStore;

/// Storage key the identifier lives under.
pub const SESSION_KEY: &str = "sessionId";

/// Length of a generated token.
const TOKEN_LEN: usize = 9;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque session identifier.
///
/// The backend never validates it; any non-blank string found in storage is
/// reused as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random base-36 token.
    pub fn generate() -> Self {
        let mut bits = Uuid::new_v4().as_u128();
        let mut token = String::with_capacity(TOKEN_LEN);
        for _ in 0..TOKEN_LEN {
            token.push(char::from(ALPHABET[(bits % 36) as usize]));
            bits /= 36;
        }
        Self(token)
    }

    /// Identifier persisted in `store`, creating and persisting one if absent.
    pub fn load_or_create(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        if let Some(existing) = store.get(SESSION_KEY)?.filter(|v| !v.trim().is_empty()) {
            tracing::debug!(session_id = %existing, "Reusing stored session");
            return Ok(Self(existing));
        }

        let id = Self::generate();
        store.set(SESSION_KEY, id.as_str())?;
        tracing::info!(name: "session.created", session_id = %id, "Created new session");
        Ok(id)
    }

    /// The token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
