use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::claims::Identity;
use super::errors::JwtError;

/// Signed token plus its expiration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact JWS serialization
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Access token issuer.
///
/// Holds only the set of accepted signing algorithms. Secret, algorithm and
/// lifetime are passed on every call, so issuing is a pure function of its
/// inputs and the clock.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    accepted: Vec<Algorithm>,
}

impl TokenIssuer {
    /// Create an issuer accepting the given algorithms.
    ///
    /// Only the HMAC family can be signed with a shared secret; any other
    /// algorithm in `accepted` is ignored.
    pub fn new(accepted: impl IntoIterator<Item = Algorithm>) -> Self {
        Self {
            accepted: accepted.into_iter().filter(is_hmac).collect(),
        }
    }

    /// Create an issuer from algorithm names such as `"HS512"`.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - A name is unknown or not secret-based
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, JwtError> {
        let accepted = names
            .iter()
            .map(|name| parse_hmac(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { accepted })
    }

    /// Algorithms this issuer signs with.
    pub fn accepted(&self) -> &[Algorithm] {
        &self.accepted
    }

    /// Resolve an algorithm name against the accepted set.
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Name is unknown or outside the accepted set
    pub fn check(&self, algorithm: &str) -> Result<Algorithm, JwtError> {
        parse_hmac(algorithm)
            .ok()
            .filter(|alg| self.accepted.contains(alg))
            .ok_or_else(|| JwtError::UnsupportedAlgorithm(algorithm.to_string()))
    }

    /// Issue a signed token valid from now for `lifetime_minutes`.
    ///
    /// # Arguments
    /// * `identity` - Identity fields to assert
    /// * `lifetime_minutes` - Token lifetime
    /// * `algorithm` - Signing algorithm name, must be accepted
    /// * `secret` - Signing secret
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm not accepted
    /// * `InvalidLifetime` - Lifetime is zero or negative
    /// * `EncodingFailed` - Expiration out of range or signing failed
    pub fn issue(
        &self,
        identity: &Identity,
        lifetime_minutes: i64,
        algorithm: &str,
        secret: &[u8],
    ) -> Result<IssuedToken, JwtError> {
        self.issue_at(Utc::now(), identity, lifetime_minutes, algorithm, secret)
    }

    /// Issue a signed token as if minted at `issued_at`.
    pub fn issue_at(
        &self,
        issued_at: DateTime<Utc>,
        identity: &Identity,
        lifetime_minutes: i64,
        algorithm: &str,
        secret: &[u8],
    ) -> Result<IssuedToken, JwtError> {
        let algorithm = self.check(algorithm)?;
        if lifetime_minutes <= 0 {
            return Err(JwtError::InvalidLifetime(lifetime_minutes));
        }
        let claims = Claims::for_identity(identity, issued_at, lifetime_minutes)?;

        let expires_at = claims.expires_at().ok_or_else(|| {
            JwtError::EncodingFailed(format!("expiration out of range: {}", claims.exp))
        })?;

        let token = encode(
            &Header::new(algorithm),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}

impl Default for TokenIssuer {
    /// Accepts HS512 only.
    fn default() -> Self {
        Self::new([Algorithm::HS512])
    }
}

fn is_hmac(algorithm: &Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

fn parse_hmac(name: &str) -> Result<Algorithm, JwtError> {
    name.parse::<Algorithm>()
        .ok()
        .filter(is_hmac)
        .ok_or_else(|| JwtError::UnsupportedAlgorithm(name.to_string()))
}
