use async_trait::async_trait;
use auth::PasswordDigest;

use crate::domain::user::models::Credentials;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::AuthError;
use crate::user::errors::UserError;

/// Port for the login and registration use cases.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// # Arguments
    /// * `command` - Raw registration payload with plaintext password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `Validation` - A field is missing or malformed; storage is not touched
    /// * `Conflict` - Username is already taken
    /// * `Internal` - Storage failed or timed out
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Authenticate credentials and issue an access token.
    ///
    /// # Arguments
    /// * `credentials` - Raw username and plaintext password
    ///
    /// # Returns
    /// Authenticated user, signed token and its expiration
    ///
    /// # Errors
    /// * `Validation` - Username or password malformed; storage is not touched
    /// * `Unauthorized` - No live account matches the credentials
    /// * `Internal` - Storage or signing failed
    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AuthError>;
}

/// Persistence operations for user records.
///
/// Soft-deleted records are invisible to every operation.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Look up a live user by username and password digest.
    ///
    /// # Arguments
    /// * `username` - Exact username
    /// * `password_digest` - Digest of the candidate password
    ///
    /// # Returns
    /// Optional user entity (None if nothing matches both fields)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_credentials(
        &self,
        username: &Username,
        password_digest: &PasswordDigest,
    ) -> Result<Option<User>, UserError>;

    /// Persist a new user to storage.
    ///
    /// Assigns a fresh identifier and the creation timestamps.
    ///
    /// # Arguments
    /// * `user` - User record with an already hashed password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken by a live user
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;
}
