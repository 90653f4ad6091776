use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Fixed `sub` claim carried by every access token.
pub const SUBJECT: &str = "API authentication";

/// Fixed `iss` claim carried by every access token.
pub const ISSUER: &str = "API";

/// Fixed `aud` claim carried by every access token.
pub const AUDIENCE: &str = "Client";

/// Identity fields asserted by an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub firstname: String,
    pub lastname: String,
}

/// Access token claims.
///
/// Custom identity fields plus the registered RFC 7519 claims. Built fresh for
/// every login and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user
    pub user_id: String,

    pub username: String,
    pub lastname: String,
    pub firstname: String,

    /// Subject
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for an identity with a lifetime in minutes.
    ///
    /// # Arguments
    /// * `identity` - User identity fields
    /// * `issued_at` - Moment the token is minted, used for `iat` and `nbf`
    /// * `lifetime_minutes` - Minutes until the token expires
    ///
    /// # Returns
    /// Claims with `exp = iat + lifetime_minutes`
    ///
    /// # Errors
    /// * `EncodingFailed` - Expiration falls outside the representable range
    pub fn for_identity(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        lifetime_minutes: i64,
    ) -> Result<Self, JwtError> {
        let expiration = Duration::try_minutes(lifetime_minutes)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JwtError::EncodingFailed(format!(
                    "expiration out of range for a lifetime of {} minutes",
                    lifetime_minutes
                ))
            })?;

        Ok(Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            lastname: identity.lastname.clone(),
            firstname: identity.firstname.clone(),
            sub: SUBJECT.to_string(),
            iss: ISSUER.to_string(),
            aud: AUDIENCE.to_string(),
            iat: issued_at.timestamp(),
            nbf: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Expiration as a UTC date-time.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
