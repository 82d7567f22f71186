//! Server configuration from environment variables.
//!
//! - `APP_ENV`: `development` (default, 127.0.0.1:5000) or `production` (0.0.0.0:8080)
//! - `HOST`, `PORT`: override the environment's bind address
//! - `SECRET_KEY`: session cookie signing key, at least 64 bytes
//! - `INACTIVITY_TIMEOUT_HOURS`: idle battles are dropped after this long (default 12)

use std::time::Duration;

/// Minimum key length accepted for cookie signing.
pub const MIN_SECRET_KEY_LEN: usize = 64;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    /// None when unset or too short; the server then generates a per-process key.
    pub secret_key: Option<String>,
    pub inactivity_timeout: Duration,
    pub cleanup_interval: Duration,
}

impl ServerConfig {
    /// Defaults for an environment.
    pub fn for_environment(environment: Environment) -> Self {
        let (host, port) = match environment {
            Environment::Development => ("127.0.0.1", 5000),
            Environment::Production => ("0.0.0.0", 8080),
        };
        Self {
            environment,
            host: host.to_string(),
            port,
            secret_key: None,
            inactivity_timeout: Duration::from_secs(12 * 3600),
            cleanup_interval: Duration::from_secs(30 * 60),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (environment, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("APP_ENV")
            .map(|e| Environment::parse(&e))
            .unwrap_or_default();
        let mut config = Self::for_environment(environment);
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            config.port = port;
        }
        config.secret_key = lookup("SECRET_KEY").filter(|k| k.len() >= MIN_SECRET_KEY_LEN);
        if let Some(hours) = lookup("INACTIVITY_TIMEOUT_HOURS").and_then(|h| h.trim().parse::<u64>().ok()) {
            config.inactivity_timeout = Duration::from_secs(hours * 3600);
        }
        config
    }

    /// Session cookies are only marked secure in production (served over HTTPS).
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }
}
