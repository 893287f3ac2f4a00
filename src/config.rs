//! Environment-driven configuration.
//!
//! Everything comes from the process environment at startup; nothing is
//! persisted. Missing required variables fail fast with a descriptive error.

/// Application configuration, loaded once and passed explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Supabase project (e.g. `https://xyz.supabase.co`).
    pub supabase_url: String,
    /// Service-role key. Bypasses row-level security; never logged.
    pub service_role_key: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// - `SUPABASE_URL` (required)
    /// - `SUPABASE_SERVICE_ROLE_KEY` (required)
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    pub fn from_env() -> anyhow::Result<Self> {
        let supabase_url = require_env("SUPABASE_URL")?;
        let service_role_key = require_env("SUPABASE_SERVICE_ROLE_KEY")?;

        let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
            tracing::info!("BIND_ADDR not set, defaulting to 0.0.0.0:8080");
            "0.0.0.0:8080".to_string()
        });

        Ok(Self {
            supabase_url,
            service_role_key,
            bind_addr,
        })
    }
}

fn require_env(name: &str) -> anyhow::Result<String> {
    std::env::var(name).map_err(|_| anyhow::anyhow!("{} must be set", name))
}
