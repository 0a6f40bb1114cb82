//! In-memory user store
//!
//! Keeps users in insertion order behind an async `RwLock`. Ids come from a
//! monotonic counter so an id is never handed out twice, even after deletes.

use chrono::{DateTime, TimeZone, Utc};
use coursenew_shared::types::{NewUser, User, UserChanges};
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::traits::{RepositoryResult, UserRepository};

/// Process-lifetime user store
#[derive(Debug)]
pub struct MemoryUserRepository {
    table: RwLock<UserTable>,
}

#[derive(Debug)]
struct UserTable {
    users: Vec<User>,
    next_id: u64,
}

impl UserTable {
    fn position(&self, id: &str) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        self.users
            .iter()
            .any(|u| u.email == email && Some(u.id.as_str()) != except_id)
    }

    fn allocate_id(&mut self) -> String {
        let id = self.next_id;
        self.next_id += 1;
        id.to_string()
    }
}

impl MemoryUserRepository {
    /// Create an empty store; the first user gets id `1`
    pub fn new() -> Self {
        Self::with_users(Vec::new())
    }

    /// Create a store holding `users`
    ///
    /// The id counter starts above both the collection length and the highest
    /// numeric id present.
    pub fn with_users(users: Vec<User>) -> Self {
        let highest = users
            .iter()
            .filter_map(|u| u.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let next_id = highest.max(users.len() as u64) + 1;

        Self {
            table: RwLock::new(UserTable { users, next_id }),
        }
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.table.read().await.users.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.table.read().await.users.is_empty()
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for MemoryUserRepository {
    async fn list(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.table.read().await.users.clone())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let table = self.table.read().await;
        Ok(table.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> RepositoryResult<User> {
        let mut table = self.table.write().await;

        if table.email_taken(&new_user.email, None) {
            return Err(RepositoryError::already_exists(new_user.email));
        }

        let now = Utc::now();
        let user = User {
            id: table.allocate_id(),
            email: new_user.email,
            name: new_user.name,
            created_at: now,
            updated_at: now,
        };
        table.users.push(user.clone());

        tracing::debug!(user_id = %user.id, total = table.users.len(), "Stored new user");
        Ok(user)
    }

    async fn update(&self, id: &str, changes: UserChanges) -> RepositoryResult<User> {
        let mut table = self.table.write().await;

        let index = table.position(id).ok_or_else(|| {
            RepositoryError::not_found(id).with_operation(RepositoryOperation::Update)
        })?;

        if let Some(email) = &changes.email {
            if table.email_taken(email, Some(id)) {
                return Err(RepositoryError::already_exists(email.as_str())
                    .with_operation(RepositoryOperation::Update));
            }
        }

        if !changes.has_updates() {
            tracing::debug!(user_id = %id, "Update carries no field changes");
        }

        let user = &mut table.users[index];
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        // Never move updated_at backwards, even if the wall clock does
        user.updated_at = Utc::now().max(user.updated_at);

        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> RepositoryResult<User> {
        let mut table = self.table.write().await;

        let index = table.position(id).ok_or_else(|| {
            RepositoryError::not_found(id).with_operation(RepositoryOperation::Delete)
        })?;

        Ok(table.users.remove(index))
    }
}

/// The three users every fresh process starts with
pub fn demo_users() -> Vec<User> {
    [
        ("1", "john.doe@example.com", "John Doe", (2024, 1, 1), (2024, 1, 15)),
        ("2", "jane.smith@example.com", "Jane Smith", (2024, 1, 2), (2024, 1, 16)),
        ("3", "bob.wilson@example.com", "Bob Wilson", (2024, 1, 3), (2024, 1, 17)),
    ]
    .into_iter()
    .map(|(id, email, name, created, updated)| User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        created_at: midnight_utc(created),
        updated_at: midnight_utc(updated),
    })
    .collect()
}

fn midnight_utc((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}
