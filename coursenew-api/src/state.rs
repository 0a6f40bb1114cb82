//! Application state shared with every handler

use std::sync::Arc;

use crate::{
    config::Config,
    repository::{demo_users, MemoryUserRepository, UserRepository},
};

/// Shared state injected through axum's `State` extractor
///
/// Generic over the user store so tests can hand in their own repository.
#[derive(Debug)]
pub struct AppState<R = MemoryUserRepository> {
    config: Arc<Config>,
    users: Arc<R>,
}

// Manual impl: cloning only bumps the Arcs, `R` need not be Clone
impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            users: Arc::clone(&self.users),
        }
    }
}

impl<R: UserRepository> AppState<R> {
    /// Create state around an existing store
    pub fn new(config: Config, users: R) -> Self {
        Self {
            config: Arc::new(config),
            users: Arc::new(users),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the user store
    pub fn users(&self) -> &R {
        &self.users
    }
}

impl AppState<MemoryUserRepository> {
    /// Build state with an in-memory store, seeded when `users.seed_demo_users` is set
    pub fn from_config(config: Config) -> Self {
        let users = if config.users.seed_demo_users {
            MemoryUserRepository::with_users(demo_users())
        } else {
            MemoryUserRepository::new()
        };

        Self::new(config, users)
    }
}
