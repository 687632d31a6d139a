use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::ApiState};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Todo endpoints
        .route(
            "/todos",
            post(handlers::todo::create_todo)
                .get(handlers::todo::list_todos)
                .delete(handlers::todo::delete_all),
        )
        .route(
            "/todos/completed",
            delete(handlers::todo::delete_completed).patch(handlers::todo::reject_completed_id),
        )
        .route(
            "/todos/:todo_id",
            patch(handlers::todo::update_todo).delete(handlers::todo::delete_todo),
        )
        .route("/todos/:todo_id/toggle", post(handlers::todo::toggle_todo))

        // Add state
        .with_state(state)

        // Add CORS and request tracing
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
