use std::path::PathBuf;

use rentfleet_core::availability::{validate_lookahead_days, DEFAULT_LOOKAHEAD_DAYS};

use crate::auth::jwt::JwtConfig;

/// Default directory for uploaded payment slips, relative to the working
/// directory.
const DEFAULT_UPLOAD_DIR: &str = "storage/payment-slips";

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
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
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// How many days ahead availability checks look for bookings
    /// (default: `365`, at most `3650`).
    pub availability_lookahead_days: i64,
    /// Directory payment slip files are written to.
    pub upload_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `HOST`                        | `0.0.0.0`                |
    /// | `PORT`                        | `3000`                   |
    /// | `CORS_ORIGINS`                | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`       | `30`                     |
    /// | `AVAILABILITY_LOOKAHEAD_DAYS` | `365`                    |
    /// | `UPLOAD_DIR`                  | `storage/payment-slips`  |
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

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let availability_lookahead_days: i64 = std::env::var("AVAILABILITY_LOOKAHEAD_DAYS")
            .unwrap_or_else(|_| DEFAULT_LOOKAHEAD_DAYS.to_string())
            .parse()
            .expect("AVAILABILITY_LOOKAHEAD_DAYS must be a valid i64");
        let availability_lookahead_days = validate_lookahead_days(availability_lookahead_days)
            .unwrap_or_else(|e| panic!("AVAILABILITY_LOOKAHEAD_DAYS: {e}"));

        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR));

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            availability_lookahead_days,
            upload_dir,
        }
    }
}
