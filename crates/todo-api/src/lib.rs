pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

// Re-exports
pub use config::Settings;
pub use error::{ApiError, ErrorResponse};
pub use routes::create_router;
pub use state::ApiState;

/// Bind `addr` and serve the todo API until the process exits.
pub async fn serve(addr: &str, state: ApiState) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Todo API running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
