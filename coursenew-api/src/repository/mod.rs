//! User storage
//!
//! Handlers depend on the [`UserRepository`] trait, never on a concrete store,
//! so the in-memory implementation can be swapped for a persistent one and
//! every test gets its own isolated instance.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::{demo_users, MemoryUserRepository};
pub use traits::{RepositoryResult, UserRepository};
