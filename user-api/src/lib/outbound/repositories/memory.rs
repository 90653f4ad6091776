use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::PasswordDigest;
use chrono::Utc;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// User store held in process memory.
///
/// Backs the integration tests and local runs without a database. The
/// uniqueness check and the insert happen under the same lock, so racing
/// registrations for one username produce exactly one record.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records, soft-deleted ones included.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned() -> UserError {
        UserError::DatabaseError("user store lock poisoned".to_string())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_credentials(
        &self,
        username: &Username,
        password_digest: &PasswordDigest,
    ) -> Result<Option<User>, UserError> {
        let users = self.users.lock().map_err(|_| Self::poisoned())?;

        Ok(users
            .values()
            .find(|u| !u.is_deleted() && u.username == *username)
            .filter(|u| u.password_digest.matches(password_digest))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut users = self.users.lock().map_err(|_| Self::poisoned())?;

        if users
            .values()
            .any(|u| !u.is_deleted() && u.username == user.username)
        {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: UserId::new(),
            username: user.username,
            password_digest: user.password_digest,
            firstname: user.firstname,
            lastname: user.lastname,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.insert(created.id, created.clone());

        Ok(created)
    }
}
