use missionboard_core::partition::{PartitionPolicy, DEFAULT_ACTIVE_SLOTS, POLICY_STATUS};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the hosted-store credentials has a default suitable for
/// local development.
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
    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    /// Access-token validation.
    pub jwt: JwtConfig,
    pub store: StoreConfig,
    /// Bucketing policy of every board.
    pub partition_policy: PartitionPolicy,
    /// Board sessions unused for this long are dropped (default: `1800`).
    pub session_idle_secs: u64,
}

/// Hosted store endpoint and keys.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Project URL, without `/rest/v1`.
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
    /// Per-request timeout of the store client (default: `10`).
    pub timeout_secs: u64,
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set in the environment"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}

impl StoreConfig {
    /// | Env Var                     | Required | Default |
    /// |-----------------------------|----------|---------|
    /// | `SUPABASE_URL`              | **yes**  | --      |
    /// | `SUPABASE_ANON_KEY`         | **yes**  | --      |
    /// | `SUPABASE_SERVICE_ROLE_KEY` | **yes**  | --      |
    /// | `STORE_TIMEOUT_SECS`        | no       | `10`    |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let timeout_secs: u64 = std::env::var("STORE_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("STORE_TIMEOUT_SECS must be a valid u64");

        Self {
            url: required("SUPABASE_URL"),
            anon_key: required("SUPABASE_ANON_KEY"),
            service_role_key: required("SUPABASE_SERVICE_ROLE_KEY"),
            timeout_secs,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3001`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    /// | `PARTITION_POLICY`     | `status`                   |
    /// | `ACTIVE_SLOTS`         | `6`                        |
    /// | `SESSION_IDLE_SECS`    | `1800`                     |
    ///
    /// See [`JwtConfig::from_env`] and [`StoreConfig::from_env`] for the
    /// required secrets.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3001".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let active_slots: usize = std::env::var("ACTIVE_SLOTS")
            .unwrap_or_else(|_| DEFAULT_ACTIVE_SLOTS.to_string())
            .parse()
            .expect("ACTIVE_SLOTS must be a valid usize");

        let policy_name = std::env::var("PARTITION_POLICY").unwrap_or_else(|_| POLICY_STATUS.into());
        let partition_policy = PartitionPolicy::parse(&policy_name, active_slots)
            .unwrap_or_else(|e| panic!("PARTITION_POLICY: {e}"));

        let session_idle_secs: u64 = std::env::var("SESSION_IDLE_SECS")
            .unwrap_or_else(|_| "1800".into())
            .parse()
            .expect("SESSION_IDLE_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            store: StoreConfig::from_env(),
            partition_policy,
            session_idle_secs,
        }
    }
}
