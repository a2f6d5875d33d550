//! Chat session identity.
//!
//! A session is identified by an opaque token generated on the client and
//! kept in client-local storage, so every restart of the same profile talks
//! to the backend as the same conversation.
//!
//! # Example
//!
//! ```rust
//! use query_desk::session::SessionId;
//! use query_desk::storage::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let first = SessionId::load_or_create(&store).unwrap();
//! let second = SessionId::load_or_create(&store).unwrap();
//! assert_eq!(first, second);
//! ```

mod id;

pub use id::{SESSION_KEY, SessionId};
