//! HTTP server entrypoint.

use std::sync::Arc;

use pipeline_tasks::api;
use pipeline_tasks::config::Config;
use pipeline_tasks::store::SupabaseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let store = Arc::new(SupabaseStore::new(
        &config.supabase_url,
        &config.service_role_key,
    ));

    api::serve(config, store).await
}
