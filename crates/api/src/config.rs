use std::str::FromStr;

use crate::auth::jwt::PrincipalTokenConfig;

/// Which [`DirectoryStore`](chapterhouse_db::store::DirectoryStore)
/// implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// In-process store; data is lost on restart.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "unknown store backend '{other}', expected 'postgres' or 'memory'"
            )),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the token secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is Postgres.
    pub database_url: Option<String>,
    pub principal_token: PrincipalTokenConfig,
    /// Auth provider endpoint answering whether an email has a credential.
    /// When unset, the check is skipped.
    pub credential_lookup_url: Option<String>,
    /// Total attempts for idempotent writes that hit a store outage.
    pub store_retry_attempts: u32,
    /// Email that receives a super admin invitation at startup if nobody
    /// has one yet.
    pub bootstrap_super_admin_email: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `HOST`                         | `0.0.0.0`               |
    /// | `PORT`                         | `3000`                  |
    /// | `CORS_ORIGINS`                 | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`         | `30`                    |
    /// | `STORE_BACKEND`                | `postgres`              |
    /// | `DATABASE_URL`                 | -- (postgres only)      |
    /// | `PRINCIPAL_TOKEN_SECRET`       | -- (required)           |
    /// | `PRINCIPAL_TOKEN_ISSUER`       | --                      |
    /// | `CREDENTIAL_LOOKUP_URL`        | --                      |
    /// | `STORE_RETRY_ATTEMPTS`         | `3`                     |
    /// | `BOOTSTRAP_SUPER_ADMIN_EMAIL`  | --                      |
    ///
    /// # Panics
    ///
    /// Panics on any malformed value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let store_backend: StoreBackend = std::env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".into())
            .parse()
            .unwrap_or_else(|e| panic!("STORE_BACKEND: {e}"));

        let database_url = optional_var("DATABASE_URL");
        if store_backend == StoreBackend::Postgres {
            assert!(
                database_url.is_some(),
                "DATABASE_URL must be set when STORE_BACKEND=postgres"
            );
        }

        let store_retry_attempts: u32 = std::env::var("STORE_RETRY_ATTEMPTS")
            .unwrap_or_else(|_| "3".into())
            .parse()
            .expect("STORE_RETRY_ATTEMPTS must be a valid u32");
        assert!(store_retry_attempts >= 1, "STORE_RETRY_ATTEMPTS must be at least 1");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            store_backend,
            database_url,
            principal_token: PrincipalTokenConfig::from_env(),
            credential_lookup_url: optional_var("CREDENTIAL_LOOKUP_URL"),
            store_retry_attempts,
            bootstrap_super_admin_email: optional_var("BOOTSTRAP_SUPER_ADMIN_EMAIL"),
        }
    }
}

/// Read an env var, treating blank values as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
