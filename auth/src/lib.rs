//! Authentication utilities library
//!
//! Provides the credential and token primitives used by the user API:
//! - Password digests (SHA-512, constant-time comparison)
//! - Access token issuance with a configurable accepted algorithm set
//! - Access token verification for protected routes
//! - Authentication coordination over immutable signing settings
//!
//! Nothing in this crate performs I/O.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let digest = hasher.hash("my_password");
//! assert!(hasher.hash("my_password").matches(&digest));
//! ```
//!
//! ## Issuing and Verifying Tokens
//! ```
//! use auth::{Identity, TokenIssuer, TokenVerifier};
//! use jsonwebtoken::Algorithm;
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let identity = Identity {
//!     user_id: "user123".to_string(),
//!     username: "alice@example.com".to_string(),
//!     firstname: "Alice".to_string(),
//!     lastname: "Liddell".to_string(),
//! };
//!
//! let issued = TokenIssuer::default()
//!     .issue(&identity, 15, "HS512", secret)
//!     .unwrap();
//! let claims = TokenVerifier::new(Algorithm::HS512, secret)
//!     .decode(&issued.token)
//!     .unwrap();
//! assert_eq!(claims.user_id, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, Identity, SigningSettings, TokenIssuer};
//!
//! let settings = SigningSettings {
//!     algorithm: "HS512".to_string(),
//!     secret: b"secret_key_at_least_32_bytes_long!".to_vec(),
//!     lifetime_minutes: 60,
//! };
//! let auth = Authenticator::new(settings, TokenIssuer::default()).unwrap();
//!
//! // Register: hash password
//! let stored = auth.hash_password("password123");
//!
//! // Login: compare digests, then issue a token
//! assert!(auth.hash_password("password123").matches(&stored));
//! let identity = Identity {
//!     user_id: "user123".to_string(),
//!     username: "alice@example.com".to_string(),
//!     firstname: "Alice".to_string(),
//!     lastname: "Liddell".to_string(),
//! };
//! let issued = auth.issue_token(&identity).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&issued.token).unwrap();
//! assert_eq!(claims.username, "alice@example.com");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::SigningSettings;
pub use jsonwebtoken::Algorithm;
pub use jwt::Claims;
pub use jwt::Identity;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use password::PasswordDigest;
pub use password::PasswordHasher;
