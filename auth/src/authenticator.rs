use std::fmt;

use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::Identity;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::password::PasswordDigest;
use crate::password::PasswordHasher;

/// Token signing settings, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct SigningSettings {
    /// Algorithm name, e.g. `"HS512"`
    pub algorithm: String,
    pub secret: Vec<u8>,
    pub lifetime_minutes: i64,
}

impl fmt::Debug for SigningSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSettings")
            .field("algorithm", &self.algorithm)
            .field("secret", &"[hidden]")
            .field("lifetime_minutes", &self.lifetime_minutes)
            .finish()
    }
}

/// Authentication coordinator combining password hashing and token handling.
///
/// Built once at startup from immutable settings. The signing algorithm is
/// checked against the issuer's accepted set here, so a misconfigured
/// algorithm fails at boot rather than on the first login.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_verifier: TokenVerifier,
    settings: SigningSettings,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `settings` - Signing algorithm, secret and token lifetime
    /// * `token_issuer` - Issuer holding the accepted algorithm set
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - `settings.algorithm` is not accepted
    /// * `InvalidLifetime` - `settings.lifetime_minutes` is not positive or
    ///   overflows the calendar
    pub fn new(settings: SigningSettings, token_issuer: TokenIssuer) -> Result<Self, JwtError> {
        let algorithm = token_issuer.check(&settings.algorithm)?;
        check_lifetime(settings.lifetime_minutes)?;
        let token_verifier = TokenVerifier::new(algorithm, &settings.secret);

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            token_issuer,
            token_verifier,
            settings,
        })
    }

    /// Hash a password for storage or comparison.
    pub fn hash_password(&self, password: &str) -> PasswordDigest {
        self.password_hasher.hash(password)
    }

    /// Issue an access token for an identity with the configured settings.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, identity: &Identity) -> Result<IssuedToken, JwtError> {
        self.token_issuer.issue(
            identity,
            self.settings.lifetime_minutes,
            &self.settings.algorithm,
            &self.settings.secret,
        )
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.token_verifier.decode(token)
    }

    pub fn lifetime_minutes(&self) -> i64 {
        self.settings.lifetime_minutes
    }
}

fn check_lifetime(lifetime_minutes: i64) -> Result<(), JwtError> {
    Duration::try_minutes(lifetime_minutes)
        .filter(|_| lifetime_minutes > 0)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .map(|_| ())
        .ok_or(JwtError::InvalidLifetime(lifetime_minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(algorithm: &str) -> SigningSettings {
        SigningSettings {
            algorithm: algorithm.to_string(),
            secret: b"test_secret_key_at_least_32_bytes!".to_vec(),
            lifetime_minutes: 15,
        }
    }

    fn identity() -> Identity {
        Identity {
            user_id: "user123".to_string(),
            username: "alice@example.com".to_string(),
            firstname: "Alice".to_string(),
            lastname: "Liddell".to_string(),
        }
    }

    #[test]
    fn test_issue_and_validate_token() {
        let authenticator =
            Authenticator::new(settings("HS512"), TokenIssuer::default()).expect("Valid settings");

        let issued = authenticator
            .issue_token(&identity())
            .expect("Failed to issue token");
        let claims = authenticator
            .validate_token(&issued.token)
            .expect("Token validation failed");

        assert_eq!(claims.user_id, "user123");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(claims.expires_at(), Some(issued.expires_at));
    }

    #[test]
    fn test_new_rejects_unsupported_algorithm() {
        let result = Authenticator::new(settings("HS256"), TokenIssuer::default());
        assert!(matches!(result, Err(JwtError::UnsupportedAlgorithm(_))));
    }

    #[test]
    fn test_new_rejects_invalid_lifetime() {
        for lifetime_minutes in [0, -5, 1_000_000_000_000, i64::MAX] {
            let settings = SigningSettings {
                lifetime_minutes,
                ..settings("HS512")
            };

            let result = Authenticator::new(settings, TokenIssuer::default());
            assert_eq!(
                result.err(),
                Some(JwtError::InvalidLifetime(lifetime_minutes))
            );
        }
    }

    #[test]
    fn test_hash_password_matches_hasher() {
        let authenticator =
            Authenticator::new(settings("HS512"), TokenIssuer::default()).expect("Valid settings");

        assert_eq!(
            authenticator.hash_password("analytical1"),
            PasswordHasher::new().hash("analytical1")
        );
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator =
            Authenticator::new(settings("HS512"), TokenIssuer::default()).expect("Valid settings");

        assert!(authenticator.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_settings_debug_hides_secret() {
        let rendered = format!("{:?}", settings("HS512"));
        assert!(rendered.contains("[hidden]"));
        assert!(!rendered.contains("test_secret_key"));
    }
}
