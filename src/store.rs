//! In-memory user store.
//!
//! The collection and the ID counter live behind a single lock so that ID
//! allocation and the append happen as one step. Cloning a [`UserStore`]
//! shares the same underlying state.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::{NewUser, User, UserId};

#[derive(Debug)]
struct Inner {
    users: Vec<User>,
    next_id: UserId,
}

/// Process-lifetime collection of users.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<RwLock<Inner>>,
}

impl UserStore {
    /// Create an empty store. The first user gets ID 1.
    pub fn new() -> Self {
        Self::from_users(Vec::new())
    }

    /// Create a store holding the two sample users.
    pub fn seeded() -> Self {
        let now = Utc::now();
        Self::from_users(vec![
            User {
                id: 1,
                name: "John Doe".to_string(),
                email: "john@example.com".to_string(),
                created_at: now - Duration::hours(24),
            },
            User {
                id: 2,
                name: "Jane Smith".to_string(),
                email: "jane@example.com".to_string(),
                created_at: now - Duration::hours(12),
            },
        ])
    }

    fn from_users(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(RwLock::new(Inner { users, next_id })),
        }
    }

    /// All users in insertion order.
    pub async fn list(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    /// Look up a user by ID.
    pub async fn get(&self, id: UserId) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
    }

    /// Append a new user, assigning the next ID and the current time.
    pub async fn create(&self, new_user: NewUser) -> User {
        let mut inner = self.inner.write().await;

        let user = User {
            id: inner.next_id,
            name: new_user.name,
            email: new_user.email,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.users.push(user.clone());

        debug!(user_id = user.id, "User stored");
        user
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
