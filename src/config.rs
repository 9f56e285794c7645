use std::str::FromStr;

use crate::error::AppError;

// Ten years
const MAX_SESSION_EXPIRY_HOURS: i64 = 24 * 365 * 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub request_timeout_secs: u64,
    pub session_expiry_hours: i64,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window_secs: u64,
    pub seed_database: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parse_var(&lookup, "SERVER_PORT", 8080)?,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://friendship.db?mode=rwc".to_string()),
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            db_min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", 5)?,
            request_timeout_secs: parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            session_expiry_hours: parse_var(&lookup, "SESSION_EXPIRY_HOURS", 24)?,
            rate_limit_max_requests: parse_var(&lookup, "RATE_LIMIT_MAX_REQUESTS", 100)?,
            rate_limit_window_secs: parse_var(&lookup, "RATE_LIMIT_WINDOW_SECS", 60)?,
            seed_database: parse_var(&lookup, "SEED_DATABASE", false)?,
        };

        if !(1..=MAX_SESSION_EXPIRY_HOURS).contains(&config.session_expiry_hours) {
            return Err(AppError::Config(format!(
                "Invalid SESSION_EXPIRY_HOURS: must be between 1 and {}",
                MAX_SESSION_EXPIRY_HOURS
            )));
        }

        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert_eq!(config.db_max_connections, 20);
        assert_eq!(config.session_expiry_hours, 24);
        assert_eq!(config.rate_limit_max_requests, 100);
        assert!(!config.seed_database);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("SERVER_HOST", "0.0.0.0"),
            ("SERVER_PORT", "9000"),
            ("SEED_DATABASE", "true"),
            ("RATE_LIMIT_WINDOW_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.server_address(), "0.0.0.0:9000");
        assert!(config.seed_database);
        assert_eq!(config.rate_limit_window_secs, 5);
    }

    #[test]
    fn session_expiry_must_be_in_range() {
        for raw in ["0", "-5", "9223372036854775807"] {
            let err = config_from(&[("SESSION_EXPIRY_HOURS", raw)]).unwrap_err();
            assert!(matches!(err, AppError::Config(_)), "{raw}");
        }
        assert!(config_from(&[("SESSION_EXPIRY_HOURS", "87600")]).is_ok());
    }

    #[test]
    fn invalid_number_is_a_config_error() {
        let err = config_from(&[("SERVER_PORT", "eighty")]).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("SERVER_PORT")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
