use gost_console::config::{ConfigError, ConsoleConfig, DEFAULT_API_URL, DEFAULT_BIND_ADDR, Env};
use serial_test::serial;
use std::{env, panic, time::Duration};

const VARS: [&str; 5] = [
    "APP_ENV",
    "GOST_API_URL",
    "JWT_SECRET",
    "CONSOLE_BIND",
    "GOST_API_TIMEOUT_SECS",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with exactly the given variables set (all others from `VARS` cleared),
/// then restores the original environment.
fn run_with_env<T, R>(vars: &[(&str, &str)], test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> =
        VARS.iter().map(|&var| (var, env::var(var).ok())).collect();

    unsafe {
        for var in VARS {
            env::remove_var(var);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_production_requires_upstream_url() {
    let result = run_with_env(&[("APP_ENV", "production"), ("JWT_SECRET", "s3cret")], || {
        ConsoleConfig::load()
    });
    assert_eq!(result.unwrap_err(), ConfigError::Missing("GOST_API_URL"));
}

#[test]
#[serial]
fn test_production_requires_jwt_secret() {
    let result = run_with_env(
        &[("APP_ENV", "production"), ("GOST_API_URL", "http://panel:8080/api/v1")],
        ConsoleConfig::load,
    );
    assert_eq!(result.unwrap_err(), ConfigError::Missing("JWT_SECRET"));
}

#[test]
#[serial]
fn test_production_with_all_settings() {
    let config = run_with_env(
        &[
            ("APP_ENV", "production"),
            ("GOST_API_URL", "https://panel.example.com/api/v1/"),
            ("JWT_SECRET", "s3cret"),
            ("GOST_API_TIMEOUT_SECS", "30"),
        ],
        ConsoleConfig::load,
    )
    .unwrap();

    assert_eq!(config.env, Env::Production);
    // Trailing slash is dropped so request paths join cleanly.
    assert_eq!(config.api_base_url, "https://panel.example.com/api/v1");
    assert_eq!(config.request_timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn test_local_env_defaults() {
    let config = run_with_env(&[("APP_ENV", "local")], ConsoleConfig::load).unwrap();

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, DEFAULT_API_URL);
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.jwt_secret, ConsoleConfig::default().jwt_secret);
}

#[test]
#[serial]
fn test_invalid_timeout_is_rejected() {
    let result = run_with_env(&[("GOST_API_TIMEOUT_SECS", "0")], ConsoleConfig::load);
    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}
