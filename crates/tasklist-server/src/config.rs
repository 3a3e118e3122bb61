use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

const MIN_SALT_LEN: usize = 8;
const MAX_SALT_LEN: usize = 48;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub password_salt: String,
    pub token_ttl: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = get("TASKLIST_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = get("TASKLIST_PORT")
            .unwrap_or_else(|| "8000".into())
            .parse()
            .context("TASKLIST_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;

        let db_path: PathBuf = get("TASKLIST_DB_PATH")
            .unwrap_or_else(|| "tasklist.db".into())
            .into();

        let jwt_secret = get("TASKLIST_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("TASKLIST_JWT_SECRET is unset or still a placeholder");
        }

        let password_salt = get("TASKLIST_PASSWORD_SALT").unwrap_or_default();
        if !(MIN_SALT_LEN..=MAX_SALT_LEN).contains(&password_salt.len()) {
            bail!(
                "TASKLIST_PASSWORD_SALT must be between {} and {} bytes",
                MIN_SALT_LEN,
                MAX_SALT_LEN
            );
        }

        let ttl_hours: i64 = get("TASKLIST_TOKEN_TTL_HOURS")
            .unwrap_or_else(|| "12".into())
            .parse()
            .context("TASKLIST_TOKEN_TTL_HOURS must be a whole number of hours")?;
        if ttl_hours <= 0 {
            bail!("TASKLIST_TOKEN_TTL_HOURS must be positive");
        }
        let token_ttl = chrono::Duration::try_hours(ttl_hours)
            .context("TASKLIST_TOKEN_TTL_HOURS is out of range")?;

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
            password_salt,
            token_ttl,
        })
    }
}
