//! Configuration settings.
//!
//! Defines the main `Config` struct and environment variable loading logic.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_u16_or(key: &str, default: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_env_u64_or(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn get_env_usize_or(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Application configuration loaded from environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to listen on; the port comes from `PORT`.
    pub listen_addr: SocketAddr,
    /// Lifetime of the game cookie in seconds.
    pub cookie_max_age_secs: u64,
    /// Maximum number of concurrently handled connections.
    pub concurrency_limit: usize,
    /// Maximum accepted request body size in bytes.
    pub client_max_body_size: usize,
    /// Logging format: "json" or "pretty".
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Every variable has a default; a value that fails to parse falls
    /// back to the default as well:
    /// - `PORT` (default 8080)
    /// - `COOKIE_MAX_AGE_SECS` (default 3600)
    /// - `CONCURRENCY_LIMIT` (default 1024)
    /// - `MAX_BODY_SIZE` (default 16384)
    /// - `LOG_FORMAT` (default "json")
    #[must_use]
    pub fn from_env() -> Arc<Self> {
        let port = get_env_u16_or("PORT", 8080);
        let listen_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port);

        Arc::new(Self {
            listen_addr,
            cookie_max_age_secs: get_env_u64_or("COOKIE_MAX_AGE_SECS", 3600),
            concurrency_limit: get_env_usize_or("CONCURRENCY_LIMIT", 1024),
            client_max_body_size: get_env_usize_or("MAX_BODY_SIZE", 16384),
            log_format: get_env_or("LOG_FORMAT", "json"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_helpers_defaults() {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            env::remove_var("TEST_MISSING_VAR");
        }
        assert_eq!(get_env_or("TEST_MISSING_VAR", "default"), "default");
        assert_eq!(get_env_u16_or("TEST_MISSING_VAR", 8080), 8080);
        assert_eq!(get_env_u64_or("TEST_MISSING_VAR", 100), 100);
        assert_eq!(get_env_usize_or("TEST_MISSING_VAR", 1), 1);
    }

    #[test]
    fn test_helpers_parsing() {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            env::set_var("TEST_P1", "123");
            assert_eq!(get_env_u16_or("TEST_P1", 1), 123);

            env::set_var("TEST_P2", "not_a_number");
            assert_eq!(get_env_u64_or("TEST_P2", 42), 42);
        }
    }

    #[test]
    fn test_config_from_env_defaults() {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            env::remove_var("PORT");
            env::remove_var("COOKIE_MAX_AGE_SECS");
            env::remove_var("LOG_FORMAT");
        }

        let config = Config::from_env();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.cookie_max_age_secs, 3600);
        assert_eq!(config.log_format, "json");
    }

    #[test]
    fn test_config_port_override() {
        let _guard = ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        unsafe {
            env::set_var("PORT", "9090");
        }

        let config = Config::from_env();

        unsafe {
            env::remove_var("PORT");
        }
        assert_eq!(config.listen_addr.port(), 9090);
    }
}
