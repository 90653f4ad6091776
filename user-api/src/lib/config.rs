use std::env;
use std::fmt;
use std::time::Duration;

use auth::Authenticator;
use auth::JwtError;
use auth::SigningSettings;
use auth::TokenIssuer;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::user::service::AuthPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Apply pending migrations when the server starts
    pub auto_migrate: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Algorithm used to sign new tokens
    pub algorithm: String,
    pub accepted_algorithms: Vec<String>,
    pub lifetime_minutes: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("accepted_algorithms", &self.accepted_algorithms)
            .field("lifetime_minutes", &self.lifetime_minutes)
            .finish()
    }
}

impl JwtConfig {
    pub fn signing_settings(&self) -> SigningSettings {
        SigningSettings {
            algorithm: self.algorithm.clone(),
            secret: self.secret.as_bytes().to_vec(),
            lifetime_minutes: self.lifetime_minutes,
        }
    }

    /// # Errors
    /// * `UnsupportedAlgorithm` - An accepted name is not a known HMAC algorithm
    pub fn token_issuer(&self) -> Result<TokenIssuer, JwtError> {
        TokenIssuer::from_names(&self.accepted_algorithms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub min_password_length: usize,
    pub store_timeout_ms: u64,
}

impl AuthConfig {
    pub fn policy(&self) -> AuthPolicy {
        AuthPolicy {
            min_password_length: self.min_password_length,
            store_timeout: Duration::from_millis(self.store_timeout_ms),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `user_api=debug,tower_http=info`
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__ACCEPTED_ALGORITHMS=HS256,HS512 overrides jwt.accepted_algorithms
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("jwt.accepted_algorithms"),
            )
            .build()?;

        configuration.try_deserialize()
    }

    /// Builder seeded with every default value except the database URL and
    /// the signing secret.
    pub fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
        ConfigBuilder::builder()
            .set_default("database.max_connections", 5)?
            .set_default("database.auto_migrate", true)?
            .set_default("server.http_port", 3000)?
            .set_default("jwt.algorithm", "HS512")?
            .set_default("jwt.accepted_algorithms", vec!["HS512"])?
            .set_default("jwt.lifetime_minutes", 15)?
            .set_default("auth.min_password_length", 8)?
            .set_default("auth.store_timeout_ms", 5000)?
            .set_default("logging.level", "user_api=debug,tower_http=debug")?
            .set_default("logging.format", "pretty")
    }

    /// Build the authenticator, failing when the signing algorithm is not
    /// in the accepted set.
    pub fn authenticator(&self) -> Result<Authenticator, JwtError> {
        Authenticator::new(self.jwt.signing_settings(), self.jwt.token_issuer()?)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Result<Config, ConfigError> {
        Config::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/users"

            [jwt]
            secret = "test_secret_key_at_least_32_bytes!"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.jwt.algorithm, "HS512");
        assert_eq!(config.jwt.accepted_algorithms, vec!["HS512".to_string()]);
        assert_eq!(config.jwt.lifetime_minutes, 15);
        assert_eq!(config.auth.policy(), AuthPolicy::default());
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "user_api=debug,tower_http=debug");
        assert!(config.authenticator().is_ok());
    }

    #[test]
    fn test_json_logging_format() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/users"

            [jwt]
            secret = "test_secret_key_at_least_32_bytes!"

            [logging]
            level = "info"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_unknown_logging_format_is_an_error() {
        let result = parse(
            r#"
            [database]
            url = "postgres://localhost/users"

            [jwt]
            secret = "test_secret_key_at_least_32_bytes!"

            [logging]
            format = "xml"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_token_lifetime_is_rejected() {
        for lifetime in [0, -5] {
            let config = parse(&format!(
                r#"
                [database]
                url = "postgres://localhost/users"

                [jwt]
                secret = "test_secret_key_at_least_32_bytes!"
                lifetime_minutes = {lifetime}
                "#
            ))
            .unwrap();

            assert!(matches!(
                config.authenticator(),
                Err(JwtError::InvalidLifetime(l)) if l == lifetime
            ));
        }
    }

    #[test]
    fn test_missing_secret_is_an_error() {
        let result = parse(
            r#"
            [database]
            url = "postgres://localhost/users"
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_signing_algorithm_outside_accepted_set_is_rejected() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/users"

            [jwt]
            secret = "test_secret_key_at_least_32_bytes!"
            algorithm = "HS256"
            accepted_algorithms = ["HS512"]
            "#,
        )
        .unwrap();

        assert!(matches!(
            config.authenticator(),
            Err(JwtError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = parse(
            r#"
            [database]
            url = "postgres://localhost/users"

            [jwt]
            secret = "test_secret_key_at_least_32_bytes!"
            "#,
        )
        .unwrap();

        let rendered = format!("{:?}", config.jwt);
        assert!(!rendered.contains("test_secret_key"));
        assert!(rendered.contains("redacted"));
    }
}
