use std::{env, time::Duration};

/// ConsoleConfig
///
/// Holds the console's entire configuration state. Loaded once at startup and shared
/// immutably through `AppState` (pulled into handlers via `FromRef`).
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    // Runtime environment marker. Selects log format and which variables are mandatory.
    pub env: Env,
    // Base URL of the upstream panel API, e.g. http://127.0.0.1:8080/api/v1.
    pub api_base_url: String,
    // Secret used to validate session JWTs issued by the upstream panel.
    pub jwt_secret: String,
    // Socket address the console listens on.
    pub bind_addr: String,
    // Per-request timeout applied to every upstream call.
    pub request_timeout: Duration,
}

/// Env
///
/// Defines the runtime context. `Production` requires every secret to be set explicitly.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const LOCAL_JWT_SECRET: &str = "gost-console-local-secret";

impl Default for ConsoleConfig {
    /// Safe values for test state scaffolding; never reads the environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: DEFAULT_API_URL.to_string(),
            jwt_secret: LOCAL_JWT_SECRET.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConsoleConfig {
    /// load
    ///
    /// Reads the configuration from environment variables. In `Production` the upstream URL
    /// and the JWT secret are mandatory; locally they fall back to development defaults.
    ///
    /// Callers are expected to fail fast on `Err` at startup.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = required_in_production(env, "GOST_API_URL", DEFAULT_API_URL)?;
        let jwt_secret = required_in_production(env, "JWT_SECRET", LOCAL_JWT_SECRET)?;

        let bind_addr = env::var("CONSOLE_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let timeout_secs = match env::var("GOST_API_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            env,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            jwt_secret,
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required_in_production(
    env: Env,
    key: &'static str,
    local_default: &str,
) -> Result<String, ConfigError> {
    match (env::var(key), env) {
        (Ok(value), _) if !value.trim().is_empty() => Ok(value),
        (_, Env::Production) => Err(ConfigError::Missing(key)),
        (_, Env::Local) => Ok(local_default.to_string()),
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            key: "GOST_API_TIMEOUT_SECS",
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Invalid {
            key: "GOST_API_TIMEOUT_SECS",
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timeout_rejects_zero_and_garbage() {
        assert_eq!(parse_timeout("15"), Ok(15));
        assert_eq!(parse_timeout(" 3 "), Ok(3));
        assert!(matches!(
            parse_timeout("0"),
            Err(ConfigError::Invalid { key: "GOST_API_TIMEOUT_SECS", .. })
        ));
        assert!(parse_timeout("ten").is_err());
    }

    #[test]
    fn default_config_is_local() {
        let config = ConsoleConfig::default();
        assert_eq!(config.env, Env::Local);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
