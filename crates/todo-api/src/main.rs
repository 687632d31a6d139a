use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::{ApiState, Settings};
use todo_db::Database;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=debug,todo_db=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Get configuration
    let settings = Settings::load()?;

    // Initialize database
    let database = Database::new(&settings.database_url).await?;
    database.init_schema().await?;

    let state = ApiState::new(database);

    todo_api::serve(&settings.address(), state).await
}
