// src/config.rs

use std::{env, fmt, net::SocketAddr};

use dotenvy::dotenv;

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:1323";
pub const DEFAULT_DATABASE_PATH: &str = "quiz.db";

/// Operating mode, selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

/// TLS material for production mode.
#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: Mode,
    pub address: SocketAddr,
    /// Present whenever `mode` is `Production`.
    pub tls: Option<TlsPaths>,
    pub database_path: String,
    pub database_password: Option<String>,
    pub admin_username: String,
    pub admin_password: String,
    pub questions_per_quiz: usize,
    pub rust_log: String,
}

/// Startup configuration failure. Always fatal.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: `{}`", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let mode = match get("APP_ENV").as_deref() {
            Some("development") => Mode::Development,
            _ => Mode::Production,
        };
        let production = mode == Mode::Production;

        let address_raw = get("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let address = address_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                key: "ADDRESS",
                value: address_raw.clone(),
            })?;

        let tls = if production {
            Some(TlsPaths {
                cert_path: get("CERT_PATH").ok_or(ConfigError::Missing("CERT_PATH"))?,
                key_path: get("KEY_PATH").ok_or(ConfigError::Missing("KEY_PATH"))?,
            })
        } else {
            None
        };

        let database_path = match get("DATABASE_PATH") {
            Some(path) => path,
            None if production => return Err(ConfigError::Missing("DATABASE_PATH")),
            None => DEFAULT_DATABASE_PATH.to_string(),
        };

        let database_password = get("DATABASE_PASSWORD");
        if production && database_password.is_none() {
            return Err(ConfigError::Missing("DATABASE_PASSWORD"));
        }

        let admin_username = get("ADMIN_USERNAME").ok_or(ConfigError::Missing("ADMIN_USERNAME"))?;
        let admin_password = get("ADMIN_PASSWORD").ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;

        let per_quiz_raw = get("QUESTIONS_PER_QUIZ").ok_or(ConfigError::Missing("QUESTIONS_PER_QUIZ"))?;
        let questions_per_quiz = per_quiz_raw
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::Invalid {
                key: "QUESTIONS_PER_QUIZ",
                value: per_quiz_raw,
            })?;

        let rust_log = get("RUST_LOG").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            mode,
            address,
            tls,
            database_path,
            database_password,
            admin_username,
            admin_password,
            questions_per_quiz,
            rust_log,
        })
    }

    pub fn is_development(&self) -> bool {
        self.mode == Mode::Development
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const DEV_BASE: &[(&str, &str)] = &[
        ("APP_ENV", "development"),
        ("ADMIN_USERNAME", "admin"),
        ("ADMIN_PASSWORD", "secret"),
        ("QUESTIONS_PER_QUIZ", "10"),
    ];

    #[test]
    fn development_defaults() {
        let config = Config::from_lookup(lookup(DEV_BASE)).unwrap();

        assert!(config.is_development());
        assert_eq!(config.address, DEFAULT_ADDRESS.parse().unwrap());
        assert_eq!(config.database_path, DEFAULT_DATABASE_PATH);
        assert!(config.database_password.is_none());
        assert!(config.tls.is_none());
        assert_eq!(config.questions_per_quiz, 10);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn production_requires_tls_and_database() {
        let err = Config::from_lookup(lookup(&[
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("QUESTIONS_PER_QUIZ", "10"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("CERT_PATH"));

        let err = Config::from_lookup(lookup(&[
            ("CERT_PATH", "cert.pem"),
            ("KEY_PATH", "key.pem"),
            ("DATABASE_PATH", "prod.db"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("QUESTIONS_PER_QUIZ", "10"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_PASSWORD"));
    }

    #[test]
    fn production_complete() {
        let config = Config::from_lookup(lookup(&[
            ("ADDRESS", "127.0.0.1:8443"),
            ("CERT_PATH", "cert.pem"),
            ("KEY_PATH", "key.pem"),
            ("DATABASE_PATH", "prod.db"),
            ("DATABASE_PASSWORD", "hunter2"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
            ("QUESTIONS_PER_QUIZ", "25"),
        ]))
        .unwrap();

        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.address.port(), 8443);
        assert_eq!(config.tls.unwrap().key_path, "key.pem");
        assert_eq!(config.database_password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn admin_credentials_always_required() {
        let err = Config::from_lookup(lookup(&[
            ("APP_ENV", "development"),
            ("ADMIN_USERNAME", "admin"),
            ("QUESTIONS_PER_QUIZ", "10"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("ADMIN_PASSWORD"));
    }

    #[test]
    fn quiz_size_must_be_positive_integer() {
        for bad in ["zero", "0", "-3"] {
            let mut pairs = DEV_BASE.to_vec();
            pairs.retain(|(k, _)| *k != "QUESTIONS_PER_QUIZ");
            pairs.push(("QUESTIONS_PER_QUIZ", bad));
            let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "QUESTIONS_PER_QUIZ", .. }));
        }
    }
}
