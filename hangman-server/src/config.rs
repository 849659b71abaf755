use std::env;

use hangman_types::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub admin_password: String,
    pub difficulty: Difficulty,
    pub target_wins: u32,
    pub session_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let target_wins = parse("TARGET_WINS", var("TARGET_WINS", "2"))?;
        if target_wins == 0 {
            return Err(ConfigError::InvalidValue {
                name: "TARGET_WINS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            host: var("HOST", "127.0.0.1"),
            port: parse("PORT", var("PORT", "8080"))?,
            database_url: var("DATABASE_URL", "sqlite://hangman.db?mode=rwc"),
            admin_password: var("ADMIN_PASSWORD", "admin123"),
            difficulty: parse("DIFFICULTY", var("DIFFICULTY", "normal"))?,
            target_wins,
            session_timeout_seconds: parse(
                "SESSION_TIMEOUT_SECONDS",
                var("SESSION_TIMEOUT_SECONDS", "1800"),
            )?,
        })
    }
}

fn parse<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        name,
        reason: e.to_string(),
        value,
    })
}
