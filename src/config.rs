use std::env;
use std::fmt;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// Server-side ceiling for sessions whose cookie dies with the browser (two weeks).
const DEFAULT_SESSION_IDLE_SECONDS: i64 = 60 * 60 * 24 * 14;

/// A configuration variable was present but could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={:?}: {}", self.key, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

/// Runtime settings, read from the environment after `.env` is loaded.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. Without one the server keeps its data in memory.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub bcrypt_cost: u32,
    pub session_idle_seconds: i64,
    pub session_cookie_secure: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            server_port: DEFAULT_PORT,
            server_host: DEFAULT_HOST.to_string(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            session_idle_seconds: DEFAULT_SESSION_IDLE_SECONDS,
            session_cookie_secure: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so callers need not touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", defaults.bcrypt_cost)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
                reason: "must be between 4 and 31",
            });
        }
        let session_idle_seconds =
            parse_or(&lookup, "SESSION_IDLE_SECONDS", defaults.session_idle_seconds)?;
        if session_idle_seconds <= 0 {
            return Err(ConfigError {
                key: "SESSION_IDLE_SECONDS",
                value: session_idle_seconds.to_string(),
                reason: "must be positive",
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            server_port: parse_or(&lookup, "SERVER_PORT", defaults.server_port)?,
            server_host: lookup("SERVER_HOST").unwrap_or(defaults.server_host),
            bcrypt_cost,
            session_idle_seconds,
            session_cookie_secure: parse_or(
                &lookup,
                "SESSION_COOKIE_SECURE",
                defaults.session_cookie_secure,
            )?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
            key,
            value: raw,
            reason: "could not be parsed",
        }),
    }
}
