use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod cli;

use cli::{Cli, Commands};
use todo_core::{MemoryStore, TaskStore};
use todo_db::Database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo=info,todo_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Run CLI
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let in_memory = matches!(cli.command, Commands::Serve { in_memory: true, .. });

    let store: Arc<dyn TaskStore> = if in_memory {
        tracing::warn!("Serving from memory, todos won't be persisted");
        Arc::new(MemoryStore::new())
    } else {
        let database = Database::new(&cli.database_url).await?;
        database.init_schema().await?;
        Arc::new(database)
    };

    let mut stdout = std::io::stdout();
    commands::execute(cli.command, store, &mut stdout).await
}
