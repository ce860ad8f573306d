//! Route definitions for the matching API.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    analyze_problem, book_worker, find_workers, get_worker, health, list_workers, AppState,
};

/// Create the API router with all endpoints.
///
/// # Endpoints
///
/// - `POST /api/analyze-problem` - Analyze a problem description
/// - `POST /api/find-workers` - Match and price workers
/// - `GET /api/workers` - List workers (optional `?trade=` filter)
/// - `GET /api/workers/:id` - Fetch one worker
/// - `POST /api/book` - Book a worker
/// - `GET /health` - Liveness probe
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze-problem", post(analyze_problem))
        .route("/api/find-workers", post(find_workers))
        .route("/api/workers", get(list_workers))
        .route("/api/workers/:id", get(get_worker))
        .route("/api/book", post(book_worker))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_creates_valid_router() {
        // Ensures the route configuration compiles and creates a valid router
        let _routes = routes();
    }
}
