use crate::calendar::Clock;
use chrono::NaiveDate;
use std::{env, net::SocketAddr, path::PathBuf};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_PATH: &str = "challenge.sqlite";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CHALLENGE_TODAY must be YYYY-MM-DD, got {0:?}")]
    InvalidToday(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub today: Option<NaiveDate>,
}

impl Config {
    /// Reads `PORT`, `CHALLENGE_DB_PATH` and `CHALLENGE_TODAY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_path = lookup("CHALLENGE_DB_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let today = match lookup("CHALLENGE_TODAY") {
            Some(raw) if !raw.trim().is_empty() => Some(
                NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                    .map_err(|_| ConfigError::InvalidToday(raw))?,
            ),
            _ => None,
        };

        Ok(Self {
            port,
            database_path,
            today,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn clock(&self) -> Clock {
        match self.today {
            Some(date) => Clock::Fixed(date),
            None => Clock::System,
        }
    }
}
