//! Configuration loading and validation.
//!
//! Configuration is layered with figment: built-in defaults, then an optional
//! YAML file, then `PRAXIS_`-prefixed environment variables (`__` separates
//! nesting levels, e.g. `PRAXIS_AUTH__SESSION__COOKIE_NAME`), then a raw
//! `DATABASE_URL` override for the database connection string.

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "praxis", about = "Practice management API server")]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short = 'f', long = "config", env = "PRAXIS_CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Validate the configuration and exit
    #[arg(long)]
    pub validate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Interface to bind to
    pub hostname: String,
    /// Port to listen on
    pub port: u16,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hostname: "0.0.0.0".to_string(),
            port: 3001,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Postgres connection string; usually supplied via `DATABASE_URL`
    pub url: Option<String>,
    pub pool: PoolSettings,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            pool: PoolSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Secret used to sign session JWTs. Must be overridden in production.
    pub jwt_secret: String,
    pub session: SessionConfig,
    pub password: PasswordConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "insecure-dev-secret-change-me".to_string(),
            session: SessionConfig::default(),
            password: PasswordConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Session lifetime (JWT expiry and cookie Max-Age)
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// SameSite attribute: Strict, Lax, or None
    pub cookie_same_site: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60 * 60 * 24),
            cookie_name: "praxis_session".to_string(),
            cookie_secure: true,
            cookie_same_site: "Lax".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PasswordConfig {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_length: 128,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins; `"*"` permits any origin
    pub allowed_origins: Vec<CorsOrigin>,
}

/// A CORS origin: either the wildcard `*` or a concrete URL.
#[derive(Debug, Clone, PartialEq)]
pub enum CorsOrigin {
    Wildcard,
    Url(Url),
}

impl Serialize for CorsOrigin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CorsOrigin::Wildcard => serializer.serialize_str("*"),
            CorsOrigin::Url(url) => serializer.serialize_str(url.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for CorsOrigin {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s == "*" {
            Ok(CorsOrigin::Wildcard)
        } else {
            Url::parse(&s)
                .map(CorsOrigin::Url)
                .map_err(|e| serde::de::Error::custom(format!("invalid CORS origin {s:?}: {e}")))
        }
    }
}

impl Config {
    /// Load configuration from defaults, optional YAML file, environment.
    pub fn load(config_path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        let config: Config = Self::figment(config_path).extract()?;
        Ok(config)
    }

    fn figment(config_path: Option<&std::path::Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file(path));
        }
        figment
            .merge(Env::prefixed("PRAXIS_").split("__"))
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }

    /// Check constraints a running server depends on.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_none() {
            anyhow::bail!("no database url configured (set DATABASE_URL or database.url)");
        }
        if self.auth.password.min_length > self.auth.password.max_length {
            anyhow::bail!(
                "password min_length ({}) exceeds max_length ({})",
                self.auth.password.min_length,
                self.auth.password.max_length
            );
        }
        match self.auth.session.cookie_same_site.as_str() {
            "Strict" | "Lax" | "None" => {}
            other => anyhow::bail!("invalid cookie_same_site {other:?} (expected Strict, Lax or None)"),
        }
        if self.auth.jwt_secret == AuthConfig::default().jwt_secret {
            tracing::warn!("running with the default jwt_secret; override it in production");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.auth.session.cookie_name, "praxis_session");
        assert_eq!(config.auth.password.min_length, 8);
    }

    #[test]
    fn test_yaml_and_env_layering() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 8080
                auth:
                  session:
                    cookie_name: from_yaml
                "#,
            )?;
            jail.set_env("PRAXIS_AUTH__SESSION__COOKIE_NAME", "from_env");
            jail.set_env("DATABASE_URL", "postgres://localhost/praxis");

            let config = Config::load(Some(std::path::Path::new("config.yaml"))).unwrap();
            assert_eq!(config.port, 8080);
            // env beats yaml
            assert_eq!(config.auth.session.cookie_name, "from_env");
            assert_eq!(
                config.database.url.as_deref(),
                Some("postgres://localhost/praxis")
            );
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_missing_database() {
        let config = Config::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_same_site() {
        let mut config = Config::default();
        config.database.url = Some("postgres://localhost/praxis".into());
        config.auth.session.cookie_same_site = "Sideways".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cors_origin_parsing() {
        let wildcard: CorsOrigin = serde_json::from_str("\"*\"").unwrap();
        assert_eq!(wildcard, CorsOrigin::Wildcard);

        let url: CorsOrigin = serde_json::from_str("\"https://app.example.com\"").unwrap();
        assert!(matches!(url, CorsOrigin::Url(_)));

        assert!(serde_json::from_str::<CorsOrigin>("\"not a url\"").is_err());
    }
}
