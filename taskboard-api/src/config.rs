/// Configuration management for the API server
///
/// Configuration is read from environment variables, with a `.env` file
/// loaded first when present.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `TASKBOARD_STORE`: `postgres` (default) or `memory`
/// - `DATABASE_URL`: PostgreSQL connection string (required for `postgres`)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `JWT_SECRET`: Secret key for token signing (required, at least 32 chars)
/// - `JWT_EXPIRY_SECONDS`: Access token lifetime (default: 3600)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `PRODUCTION`: Enables HSTS when `true` (default: false)
/// - `LOG_FORMAT`: `json` for JSON logs, anything else for text
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use taskboard_shared::auth::jwt::DEFAULT_TOKEN_LIFETIME_SECS;

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Storage configuration
    pub store: StoreConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Logging configuration
    pub log: LogConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` means permissive)
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Which backend holds users and tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// PostgreSQL via `DATABASE_URL`
    Postgres,

    /// Process memory; data is lost on restart
    Memory,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selection
    pub kind: StoreKind,

    /// PostgreSQL connection URL (unused for the memory backend)
    pub database_url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// Must be at least 32 bytes. Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// Access token lifetime in seconds
    pub expiry_seconds: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Config {
    /// Loads configuration from the process environment (and `.env`)
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value is
    /// invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(&env::vars().collect())
    }

    /// Builds configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        let get = |key: &str| vars.get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = get("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = get("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let production = parse_bool(get("PRODUCTION").as_deref())?;

        let kind = match get("TASKBOARD_STORE").as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => anyhow::bail!("TASKBOARD_STORE must be 'postgres' or 'memory', got '{}'", other),
        };

        let database_url = get("DATABASE_URL");
        if kind == StoreKind::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL environment variable is required");
        }

        let max_connections = get("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let secret = get("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_JWT_SECRET_LEN);
        }

        let expiry_seconds = get("JWT_EXPIRY_SECONDS")
            .map(|v| v.parse::<i64>())
            .transpose()
            .map_err(|e| anyhow::anyhow!("JWT_EXPIRY_SECONDS is invalid: {}", e))?
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        if expiry_seconds <= 0 {
            anyhow::bail!("JWT_EXPIRY_SECONDS must be positive");
        }

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            store: StoreConfig {
                kind,
                database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                expiry_seconds,
            },
            log: LogConfig {
                json: get("LOG_FORMAT").as_deref() == Some("json"),
            },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Access token lifetime
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.jwt.expiry_seconds)
    }

    /// In-memory configuration for tests and local experiments
    pub fn for_memory_store(secret: impl Into<String>) -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            store: StoreConfig {
                kind: StoreKind::Memory,
                database_url: None,
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: secret.into(),
                expiry_seconds: DEFAULT_TOKEN_LIFETIME_SECS,
            },
            log: LogConfig { json: false },
        }
    }
}

fn parse_bool(value: Option<&str>) -> anyhow::Result<bool> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("false") | Some("0") | Some("no") => Ok(false),
        Some("true") | Some("1") | Some("yes") => Ok(true),
        Some(other) => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_vars(&vars(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.store.kind, StoreKind::Postgres);
        assert_eq!(config.store.max_connections, 10);
        assert_eq!(config.jwt.expiry_seconds, DEFAULT_TOKEN_LIFETIME_SECS);
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert!(!config.api.production);
        assert!(!config.log.json);
    }

    #[test]
    fn test_secret_required_and_long_enough() {
        let missing = Config::from_vars(&vars(&[("TASKBOARD_STORE", "memory")]));
        assert!(missing.unwrap_err().to_string().contains("JWT_SECRET"));

        let short = Config::from_vars(&vars(&[("TASKBOARD_STORE", "memory"), ("JWT_SECRET", "short")]));
        assert!(short.unwrap_err().to_string().contains("at least 32"));
    }

    #[test]
    fn test_database_url_required_for_postgres_only() {
        let pg = Config::from_vars(&vars(&[("JWT_SECRET", SECRET)]));
        assert!(pg.unwrap_err().to_string().contains("DATABASE_URL"));

        let memory = Config::from_vars(&vars(&[("JWT_SECRET", SECRET), ("TASKBOARD_STORE", "memory")])).unwrap();
        assert_eq!(memory.store.kind, StoreKind::Memory);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(&vars(&[
            ("TASKBOARD_STORE", "memory"),
            ("JWT_SECRET", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "9000"),
            ("JWT_EXPIRY_SECONDS", "60"),
            ("CORS_ORIGINS", "http://localhost:3000, https://tasks.example.com"),
            ("PRODUCTION", "true"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.token_lifetime(), chrono::Duration::seconds(60));
        assert_eq!(
            config.api.cors_origins,
            vec!["http://localhost:3000", "https://tasks.example.com"]
        );
        assert!(config.api.production);
        assert!(config.log.json);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_vars(&vars(&[("JWT_SECRET", SECRET), ("TASKBOARD_STORE", "mongo")])).is_err());
        assert!(Config::from_vars(&vars(&[
            ("JWT_SECRET", SECRET),
            ("TASKBOARD_STORE", "memory"),
            ("API_PORT", "eighty"),
        ]))
        .is_err());
        assert!(Config::from_vars(&vars(&[
            ("JWT_SECRET", SECRET),
            ("TASKBOARD_STORE", "memory"),
            ("JWT_EXPIRY_SECONDS", "0"),
        ]))
        .is_err());
    }
}
