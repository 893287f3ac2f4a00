//! Terminal client for the today dashboard.
//!
//! Renders the tasks due today and accepts commands on stdin:
//! - `r` / `refresh` - reload from the store
//! - `c <id>` / `complete <id>` - mark a task complete
//! - `q` / `quit` - exit

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use pipeline_tasks::config::Config;
use pipeline_tasks::dashboard::{self, TodayView};
use pipeline_tasks::store::SupabaseStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the table stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::from_env()?;
    let store = Arc::new(SupabaseStore::new(
        &config.supabase_url,
        &config.service_role_key,
    ));

    let mut view = TodayView::new(store);
    view.refresh().await;
    print_view(&mut view);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let mut parts = line.split_whitespace();

        match (parts.next(), parts.next()) {
            (Some("q") | Some("quit"), _) => break,
            (Some("r") | Some("refresh"), _) => view.refresh().await,
            (Some("c") | Some("complete"), Some(id)) => view.mark_complete(id).await,
            (Some(cmd), _) => {
                println!("Unknown command: {}", cmd);
                continue;
            }
            (None, _) => continue,
        }

        print_view(&mut view);
    }

    Ok(())
}

fn print_view(view: &mut TodayView) {
    if let Some(alert) = view.take_alert() {
        println!("\x1b[31m{}\x1b[0m", alert);
    }
    print!("{}", dashboard::render(view));
}
