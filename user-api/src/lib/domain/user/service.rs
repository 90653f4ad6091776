use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::user::models::Credentials;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::user::errors::AuthError;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Input rules and storage deadline applied by [`UserService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthPolicy {
    pub min_password_length: usize,
    /// Upper bound on every store call
    pub store_timeout: Duration,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            store_timeout: Duration::from_secs(5),
        }
    }
}

/// Domain service implementing the login and registration flows.
///
/// Holds no mutable state: every call is a function of its input, the
/// repository and the immutable authenticator.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    policy: AuthPolicy,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hashing and token signing
    /// * `policy` - Validation rules and storage deadline
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>, policy: AuthPolicy) -> Self {
        Self {
            repository,
            authenticator,
            policy,
        }
    }

    /// Run a store call under the configured deadline.
    async fn bounded<T, F>(&self, operation: F) -> Result<T, UserError>
    where
        F: Future<Output = Result<T, UserError>> + Send,
    {
        tokio::time::timeout(self.policy.store_timeout, operation)
            .await
            .map_err(|_| {
                UserError::Timeout(format!(
                    "no response within {} ms",
                    self.policy.store_timeout.as_millis()
                ))
            })?
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        let username = command.validate(self.policy.min_password_length)?;

        let new_user = NewUser {
            username,
            password_digest: self.authenticator.hash_password(&command.password),
            firstname: command.firstname,
            lastname: command.lastname,
        };

        let created_user = self
            .bounded(self.repository.create(new_user))
            .await
            .map_err(|e| match e {
                UserError::UsernameAlreadyExists(username) => {
                    tracing::info!("Registration rejected, username already taken");
                    AuthError::Conflict(username)
                }
                other => {
                    tracing::error!("Failed to create user: {}", other);
                    AuthError::Internal(other.to_string())
                }
            })?;

        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn login(&self, credentials: Credentials) -> Result<LoginOutcome, AuthError> {
        let username = credentials.validate(self.policy.min_password_length)?;
        let password_digest = self.authenticator.hash_password(&credentials.password);
        drop(credentials);

        let user = self
            .bounded(
                self.repository
                    .find_by_credentials(&username, &password_digest),
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up credentials: {}", e);
                AuthError::Internal(e.to_string())
            })?
            .ok_or_else(|| {
                tracing::debug!("Login rejected, credentials did not match");
                AuthError::Unauthorized
            })?;

        let issued = self
            .authenticator
            .issue_token(&user.identity())
            .map_err(|e| {
                tracing::error!("Failed to issue token for user {}: {}", user.id, e);
                AuthError::Internal(e.to_string())
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
