use std::fmt;

use sha2::Digest;
use sha2::Sha512;

/// Hex-encoded SHA-512 digest of a password.
///
/// Always 128 lowercase hex characters when produced by [`PasswordHasher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Length of a hex encoded SHA-512 digest.
    pub const HEX_LENGTH: usize = 128;

    /// Wrap a digest loaded from storage.
    ///
    /// No re-hashing takes place: the value must already be a digest.
    pub fn from_stored(digest: String) -> Self {
        Self(digest)
    }

    /// Get digest as hex string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare two digests in constant time.
    ///
    /// Runs over every byte regardless of where the first difference is,
    /// so the comparison does not leak the length of the matching prefix.
    pub fn matches(&self, other: &PasswordDigest) -> bool {
        let a = self.0.as_bytes();
        let b = other.0.as_bytes();

        if a.len() != b.len() {
            return false;
        }

        a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Password hashing implementation.
///
/// One-way, deterministic SHA-512 transform: the same plaintext always yields
/// the same digest, which is what lets login compare a candidate digest with
/// the stored one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password, any content including empty
    ///
    /// # Returns
    /// Hex encoded 512-bit digest
    pub fn hash(&self, password: &str) -> PasswordDigest {
        let digest = Sha512::digest(password.as_bytes());
        PasswordDigest(hex::encode(digest))
    }
}
