use sqlx::postgres::PgConnectOptions;

use crate::{Error, Result};

pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_PORT: &str = "DB_PORT";
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DATABASE: &str = "DB_NAME";

/// Connection parameters for the relational store.
#[derive(Clone, PartialEq, Eq)]
pub struct PgConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl PgConfig {
    /// Read and validate the `DB_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Every variable must be present, and the
    /// result must pass [`PgConfig::validate`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key).ok_or_else(|| Error::Config(format!("{} must be set", key)))
        };

        let host = required(ENV_HOST)?;
        let port = required(ENV_PORT)?;
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|e| Error::Config(format!("{} is not a valid port ({}): {}", ENV_PORT, port, e)))?;

        let config = Self {
            host,
            port,
            user: required(ENV_USER)?,
            password: required(ENV_PASSWORD)?,
            database: required(ENV_DATABASE)?,
        };
        config.validate()?;

        Ok(config)
    }

    /// Host, user and database must be non-empty and the port non-zero.
    /// An empty password is allowed.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            (ENV_HOST, &self.host),
            (ENV_USER, &self.user),
            (ENV_DATABASE, &self.database),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{} is empty", key)));
            }
        }

        if self.port == 0 {
            return Err(Error::Config(format!("{} must not be 0", ENV_PORT)));
        }

        Ok(())
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

impl std::fmt::Debug for PgConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete() -> HashMap<String, String> {
        env(&[
            (ENV_HOST, "localhost"),
            (ENV_PORT, "5432"),
            (ENV_USER, "postgres"),
            (ENV_PASSWORD, "secret"),
            (ENV_DATABASE, "tasks"),
        ])
    }

    #[test]
    fn test_from_lookup() {
        let vars = complete();
        let config = PgConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "tasks");
    }

    #[test]
    fn test_missing_variable() {
        let mut vars = complete();
        vars.remove(ENV_USER);

        let err = PgConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: DB_USER must be set");
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = complete();
        vars.insert(ENV_PORT.to_string(), "postgres".to_string());

        let err = PgConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_password_allowed() {
        let mut vars = complete();
        vars.insert(ENV_PASSWORD.to_string(), String::new());

        let config = PgConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert!(config.password.is_empty());

        vars.insert(ENV_HOST.to_string(), "  ".to_string());
        let err = PgConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: DB_HOST is empty");
    }

    #[test]
    fn test_zero_port() {
        let mut vars = complete();
        vars.insert(ENV_PORT.to_string(), "0".to_string());

        assert!(PgConfig::from_lookup(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn test_debug_redacts_password() {
        let vars = complete();
        let config = PgConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("localhost"));
    }
}
