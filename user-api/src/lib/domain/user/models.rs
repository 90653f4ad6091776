use std::fmt;
use std::str::FromStr;

use auth::Identity;
use auth::PasswordDigest;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::user::validation::ValidationErrors;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// `password_digest` always holds a digest, never the plaintext. A record
/// with `deleted_at` set is soft-deleted and invisible to every lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub password_digest: PasswordDigest,
    pub firstname: String,
    pub lastname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Identity fields asserted by this user's access tokens.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id.to_string(),
            username: self.username.as_str().to_string(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
        }
    }
}

/// Column widths of the `users` table, in characters.
pub const MAX_USERNAME_LENGTH: usize = 127;
pub const MAX_NAME_LENGTH: usize = 63;

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Usernames are email-shaped; the format is checked with an RFC 5322
/// compliant parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new valid username.
    ///
    /// # Errors
    /// * `Empty` - Username is blank
    /// * `InvalidFormat` - Username is not an email address
    pub fn new(username: String) -> Result<Self, UsernameError> {
        if username.trim().is_empty() {
            return Err(UsernameError::Empty);
        }

        email_address::EmailAddress::from_str(&username)
            .map(|_| Username(username))
            .map_err(|e| UsernameError::InvalidFormat(e.to_string()))
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User record ready for insertion. The store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: Username,
    pub password_digest: PasswordDigest,
    pub firstname: String,
    pub lastname: String,
}

/// Raw login payload.
///
/// Holds the plaintext password only for the duration of one login call.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Check the payload shape.
    ///
    /// # Returns
    /// Validated username
    ///
    /// # Errors
    /// * `ValidationErrors` - Username is not an email or too long, or password
    ///   is too short
    pub fn validate(&self, min_password_length: usize) -> Result<Username, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let username = if exceeds(&self.username, MAX_USERNAME_LENGTH) {
            errors.add("username", too_long(MAX_USERNAME_LENGTH));
            None
        } else {
            match Username::new(self.username.clone()) {
                Ok(username) => Some(username),
                Err(_) => {
                    errors.add("username", "must be a valid email address");
                    None
                }
            }
        };

        if self.password.chars().count() < min_password_length {
            errors.add(
                "password",
                format!("must be at least {min_password_length} characters"),
            );
        }

        match username {
            Some(username) => errors.into_result(username),
            None => Err(errors),
        }
    }
}

/// Raw registration payload.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
}

impl RegisterCommand {
    /// Check the payload shape.
    ///
    /// All four fields are required. A present username must be an email
    /// address and a present password must meet the minimum length, so that
    /// the account can later pass login validation. Names and username must
    /// fit their columns.
    ///
    /// # Returns
    /// Validated username
    ///
    /// # Errors
    /// * `ValidationErrors` - One entry per rejected field
    pub fn validate(&self, min_password_length: usize) -> Result<Username, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        for (field, value) in [("firstname", &self.firstname), ("lastname", &self.lastname)] {
            if value.trim().is_empty() {
                errors.add(field, "is required");
            } else if exceeds(value, MAX_NAME_LENGTH) {
                errors.add(field, too_long(MAX_NAME_LENGTH));
            }
        }

        let username = match Username::new(self.username.clone()) {
            Ok(_) | Err(UsernameError::InvalidFormat(_))
                if exceeds(&self.username, MAX_USERNAME_LENGTH) =>
            {
                errors.add("username", too_long(MAX_USERNAME_LENGTH));
                None
            }
            Ok(username) => Some(username),
            Err(UsernameError::Empty) => {
                errors.add("username", "is required");
                None
            }
            Err(UsernameError::InvalidFormat(_)) => {
                errors.add("username", "must be a valid email address");
                None
            }
        };

        if self.password.is_empty() {
            errors.add("password", "is required");
        } else if self.password.chars().count() < min_password_length {
            errors.add(
                "password",
                format!("must be at least {min_password_length} characters"),
            );
        }

        match username {
            Some(username) => errors.into_result(username),
            None => Err(errors),
        }
    }
}

fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}

fn too_long(max: usize) -> String {
    format!("must be at most {max} characters")
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
