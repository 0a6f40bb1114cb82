//! Repository trait for user storage
//!
//! Uses RPITIT (Return Position Impl Trait In Traits) so implementations can
//! be written with plain `async fn` and handlers stay generic over the store.

use std::future::Future;

use coursenew_shared::types::{NewUser, User, UserChanges};

use super::error::RepositoryError;

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Storage for users
///
/// Implementations must keep `id` and `email` unique across the collection and
/// perform each lookup-then-mutate sequence atomically.
pub trait UserRepository: Send + Sync + 'static {
    /// All users in insertion order
    fn list(&self) -> impl Future<Output = RepositoryResult<Vec<User>>> + Send;

    /// Find a user by exact id match
    ///
    /// Returns `Ok(None)` when no user has this id.
    fn find_by_id(&self, id: &str) -> impl Future<Output = RepositoryResult<Option<User>>> + Send;

    /// Append a new user, assigning its id and timestamps
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if the email is already taken.
    fn create(&self, new_user: NewUser) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Overwrite the supplied fields and refresh `updated_at`
    ///
    /// # Errors
    ///
    /// - `NotFound` if no user has this id
    /// - `AlreadyExists` if the new email belongs to another user
    fn update(
        &self,
        id: &str,
        changes: UserChanges,
    ) -> impl Future<Output = RepositoryResult<User>> + Send;

    /// Remove a user and return it
    ///
    /// # Errors
    ///
    /// `NotFound` if no user has this id.
    fn delete(&self, id: &str) -> impl Future<Output = RepositoryResult<User>> + Send;
}
