//! Credential management.
//!
//! # Data Flow
//! ```text
//! login(token, remember)
//!     → session.rs (select store, clear the other)
//!     → store.rs (MemoryStore | FileStore)
//!
//! every request
//!     → SessionContext::token() (durable first)
//!     → Authorization: Bearer <token>
//!
//! 401 response / logout
//!     → SessionContext::clear_token()
//! ```

pub mod session;
pub mod store;

pub use session::{bearer_token, CurrentUser, SessionContext};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError};
