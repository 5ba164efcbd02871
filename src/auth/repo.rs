use std::collections::HashMap;

use parking_lot::RwLock;
use time::OffsetDateTime;

pub use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
#[error("username {0:?} is already registered")]
pub struct UsernameTaken(pub String);

#[derive(Default)]
struct UserTable {
    next_id: i64,
    users: Vec<User>,
    by_username: HashMap<String, usize>,
}

/// In-memory users keyed by username, kept in registration order.
#[derive(Default)]
pub struct UserStore {
    inner: RwLock<UserTable>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new user, assigning the next id. Fails if the username exists.
    pub fn create(&self, new: NewUser) -> Result<User, UsernameTaken> {
        let mut table = self.inner.write();
        if table.by_username.contains_key(&new.username) {
            return Err(UsernameTaken(new.username));
        }

        table.next_id += 1;
        let user = User {
            id: table.next_id,
            username: new.username,
            email: new.email,
            full_name: new.full_name,
            password_hash: new.password_hash,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
        };
        let idx = table.users.len();
        table.by_username.insert(user.username.clone(), idx);
        table.users.push(user.clone());
        Ok(user)
    }

    /// Find a user by username.
    pub fn find_by_username(&self, username: &str) -> Option<User> {
        let table = self.inner.read();
        table
            .by_username
            .get(username)
            .map(|&idx| table.users[idx].clone())
    }

    pub fn list_all(&self) -> Vec<User> {
        self.inner.read().users.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
