use std::env;
use std::str::FromStr;

use chrono::Duration;

/// Outbound mail API settings
#[derive(Debug, Clone, Default)]
pub struct MailConfig {
    pub host: String,
    pub token: String,
    pub sender_email: String,
    pub sender_name: String,
}

impl MailConfig {
    /// An empty host means mail is only logged, never delivered.
    pub fn is_enabled(&self) -> bool {
        !self.host.trim().is_empty()
    }
}

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub token_secret: String,
    pub port: u16,
    pub mail: MailConfig,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    pub verification_code_ttl: Duration,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub email_queue_capacity: usize,
    pub token_sweep_interval_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let token_secret = env::var("TOKEN_SECRET")
            .map_err(|_| "TOKEN_SECRET must be set".to_string())?;
        if token_secret.trim().is_empty() {
            return Err("TOKEN_SECRET must not be empty".to_string());
        }

        let mail = MailConfig {
            host: env::var("MAIL_HOST").unwrap_or_default(),
            token: env::var("MAIL_TOKEN").unwrap_or_default(),
            sender_email: env::var("SENDER_EMAIL").unwrap_or_default(),
            sender_name: env::var("SENDER_NAME").unwrap_or_else(|_| "Hazel".to_string()),
        };

        Ok(Self {
            database_url,
            token_secret,
            port: parse_or("PORT", 8080)?,
            mail,
            access_token_ttl: Duration::minutes(parse_ttl("ACCESS_TOKEN_TTL_MINUTES", 120)?),
            refresh_token_ttl: Duration::days(parse_ttl("REFRESH_TOKEN_TTL_DAYS", 15)?),
            verification_code_ttl: Duration::minutes(parse_ttl("VERIFICATION_CODE_TTL_MINUTES", 15)?),
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            db_acquire_timeout_secs: parse_or("DB_ACQUIRE_TIMEOUT_SECS", 5)?,
            email_queue_capacity: parse_or("EMAIL_QUEUE_CAPACITY", 256)?,
            token_sweep_interval_minutes: parse_or("TOKEN_SWEEP_INTERVAL_MINUTES", 60)?,
        })
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| format!("{key} has an invalid value: '{raw}'")),
        _ => Ok(default),
    }
}

/// Lifetimes are whole positive units. `u32` keeps the resulting
/// `chrono::Duration` far inside its range.
fn parse_ttl(key: &str, default: u32) -> Result<i64, String> {
    match parse_or::<u32>(key, default)? {
        0 => Err(format!("{key} must be greater than zero")),
        value => Ok(i64::from(value)),
    }
}
