//! Application configuration loaded from environment variables.
//!
//! Every variable is optional; missing values fall back to development
//! defaults so the application always starts.
//!
//! # Environment Variables
//!
//! - `SECRET_KEY` - Session signing secret (default: development placeholder)
//! - `DATABASE_URL` - SQLite connection string
//!   (default: `sqlite://<INSTANCE_PATH>/database.db`)
//! - `INSTANCE_PATH` - Writable instance directory (default: `instance`)
//! - `APP_HOST` - Bind address (default: 127.0.0.1)
//! - `APP_PORT` - Listen port (default: 5000)
//! - `SESSION_COOKIE_SECURE` - Mark the session cookie `Secure` (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Fallback session secret. Fine for local development only.
pub const DEFAULT_SECRET_KEY: &str = "una_clave_secreta_por_defecto_cambiar_en_prod";

const DEFAULT_INSTANCE_PATH: &str = "instance";
const DATABASE_FILE_NAME: &str = "database.db";

const MIN_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "cambiar",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "por_defecto",
    "xxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Secret used to sign session cookies
    pub secret_key: SecretString,
    /// SQLite connection URL
    pub database_url: SecretString,
    /// Instance directory holding the default database file
    pub instance_path: PathBuf,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Whether the session cookie carries the `Secure` attribute
    pub session_cookie_secure: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure instead of touching
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret_key = get_or_default(&lookup, "SECRET_KEY", DEFAULT_SECRET_KEY);

        let instance_path =
            PathBuf::from(get_or_default(&lookup, "INSTANCE_PATH", DEFAULT_INSTANCE_PATH));

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            format!(
                "sqlite://{}",
                instance_path.join(DATABASE_FILE_NAME).display()
            )
        });

        let host = get_or_default(&lookup, "APP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_HOST".to_string(), e.to_string()))?;
        let port = get_or_default(&lookup, "APP_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_PORT".to_string(), e.to_string()))?;
        let session_cookie_secure = parse_bool(
            "SESSION_COOKIE_SECURE",
            &get_or_default(&lookup, "SESSION_COOKIE_SECURE", "false"),
        )?;

        Ok(Self {
            secret_key: SecretString::from(secret_key),
            database_url: SecretString::from(database_url),
            instance_path,
            host,
            port,
            session_cookie_secure,
            sentry_dsn: lookup("SENTRY_DSN"),
        })
    }

    /// Why the session secret is unfit for production, if it is.
    ///
    /// A weak secret never stops startup; callers log this once their
    /// tracing subscriber is installed.
    #[must_use]
    pub fn secret_warning(&self) -> Option<ConfigError> {
        validate_secret_strength(self.secret_key.expose_secret(), "SECRET_KEY").err()
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the database lives in a local SQLite file (as opposed to memory).
    #[must_use]
    pub fn uses_file_database(&self) -> bool {
        let url = self.database_url.expose_secret();
        url.starts_with("sqlite:") && !url.contains(":memory:") && !url.contains("mode=memory")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Parse a boolean flag (`true`/`false`/`1`/`0`, case-insensitive).
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check that a secret is long, not a placeholder, and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_any_variable() {
        let config = AppConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.secret_key.expose_secret(), DEFAULT_SECRET_KEY);
        assert_eq!(
            config.database_url.expose_secret(),
            "sqlite://instance/database.db"
        );
        assert_eq!(config.instance_path, PathBuf::from("instance"));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:5000");
        assert!(!config.session_cookie_secure);
        assert!(config.sentry_dsn.is_none());
        assert!(config.uses_file_database());
    }

    #[test]
    fn test_default_database_follows_instance_path() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("INSTANCE_PATH", "/srv/tax")])).unwrap();
        assert_eq!(
            config.database_url.expose_secret(),
            "sqlite:///srv/tax/database.db"
        );
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SECRET_KEY", "k9#Qz!2mX@v7Lp$4Rt8&Wn1^Yb6*Hc3%"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("APP_HOST", "0.0.0.0"),
            ("APP_PORT", "8080"),
            ("SESSION_COOKIE_SECURE", "TRUE"),
        ]))
        .unwrap();

        assert_eq!(config.database_url.expose_secret(), "sqlite::memory:");
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.session_cookie_secure);
        assert!(!config.uses_file_database());
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("APP_PORT", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "APP_PORT"));
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("SESSION_COOKIE_SECURE", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_shannon_entropy_edges() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_default_secret_is_flagged_as_placeholder() {
        let err = validate_secret_strength(DEFAULT_SECRET_KEY, "SECRET_KEY").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_short_secret_is_flagged() {
        assert!(validate_secret_strength("aB3$xY9!", "SECRET_KEY").is_err());
    }

    #[test]
    fn test_default_config_reports_secret_warning() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let warning = config.secret_warning().expect("default secret is a placeholder");
        assert!(warning.to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn test_strong_secret_has_no_warning() {
        let config = AppConfig::from_lookup(lookup_from(&[(
            "SECRET_KEY",
            "k9#Qz!2mX@v7Lp$4Rt8&Wn1^Yb6*Hc3%",
        )]))
        .unwrap();
        assert!(config.secret_warning().is_none());
    }

    #[test]
    fn test_random_secret_passes() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", "SECRET_KEY").is_ok());
    }
}
